//! Renderer configuration module.
//!
//! Handles loading, validating, and merging `polaroid.toml`. The file is
//! sparse: stock defaults are the base layer and the user file overrides
//! only the keys it names. Command-line flags override both.
//!
//! ## Config File Location
//!
//! `polaroid.toml` in the working directory, or any file passed with
//! `--config`. Without a file the stock defaults are used.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "input"               # Directory scanned for photos
//! output_dir = "output"             # Where composites are written
//!
//! [style]
//! preset = "square-insta-compact"   # Preset id or alias (FC, ISC, ...)
//! color_scheme = "light"            # light | dark (L | D)
//!
//! [fonts]
//! main = "fonts/caption-bold.ttf"   # Camera caption face
//! sub = "fonts/caption-regular.ttf" # Exposure caption face
//!
//! [output]
//! compression = "fast"              # fast | default | best
//!
//! [processing]
//! max_processes = 4                 # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::batch::{BatchRequest, PngCompression};
use crate::style::{ColorSchemeId, PresetId, StyleError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "polaroid.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Renderer configuration loaded from `polaroid.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolaroidConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Preset and color scheme.
    pub style: StyleConfig,
    /// Caption font files.
    pub fonts: FontsConfig,
    /// PNG encoder settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PolaroidConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            style: StyleConfig::default(),
            fonts: FontsConfig::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PolaroidConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.preset_id()?;
        self.color_scheme_id()?;
        if self.fonts.main.as_os_str().is_empty() || self.fonts.sub.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "fonts.main and fonts.sub must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn preset_id(&self) -> Result<PresetId, ConfigError> {
        self.style
            .preset
            .parse()
            .map_err(|e: StyleError| ConfigError::Validation(format!("style.preset: {e}")))
    }

    pub fn color_scheme_id(&self) -> Result<ColorSchemeId, ConfigError> {
        self.style
            .color_scheme
            .parse()
            .map_err(|e: StyleError| ConfigError::Validation(format!("style.color_scheme: {e}")))
    }

    /// The batch described by this config.
    pub fn batch_request(&self) -> Result<BatchRequest, ConfigError> {
        Ok(BatchRequest {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            preset: self.preset_id()?,
            color_scheme: self.color_scheme_id()?,
            compression: self.output.compression,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Preset id or alias, see `polaroid presets`.
    pub preset: String,
    pub color_scheme: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            preset: PresetId::SquareInstaCompact.as_str().to_string(),
            color_scheme: ColorSchemeId::Light.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    pub main: PathBuf,
    pub sub: PathBuf,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            main: PathBuf::from("fonts/caption-bold.ttf"),
            sub: PathBuf::from("fonts/caption-regular.ttf"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub compression: PngCompression,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PolaroidConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<PolaroidConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PolaroidConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
/// the working directory is used when present, or the stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<PolaroidConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                Some(load_raw_config(default)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `polaroid.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Polaroid Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read from ./polaroid.toml or from the path given with --config.
# Command-line flags override these values.
# Unknown keys will cause an error.

# Directory scanned for photos (jpg, jpeg, png, tif, tiff, webp).
input_dir = "input"

# Directory the PNG composites are written to.
output_dir = "output"

# ---------------------------------------------------------------------------
# Style
# ---------------------------------------------------------------------------
[style]
# One of: full, half, quarter, square-insta, full-compact, half-compact,
# quarter-compact, square-insta-compact (aliases F, H, Q, IS, FC, HC, QC, ISC).
preset = "square-insta-compact"

# light (black text on white) or dark (white text on black). Aliases L, D.
color_scheme = "light"

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# TrueType/OpenType faces for the camera caption and the exposure caption.
main = "fonts/caption-bold.ttf"
sub = "fonts/caption-regular.ttf"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# PNG compression effort: fast, default or best.
compression = "fast"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = PolaroidConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("input"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.style.preset, "square-insta-compact");
        assert_eq!(config.style.color_scheme, "light");
        assert_eq!(config.output.compression, PngCompression::Fast);
        assert_eq!(config.processing.max_processes, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[style]
preset = "FC"
"#;
        let config: PolaroidConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.preset_id().unwrap(), PresetId::FullCompact);
        assert_eq!(config.color_scheme_id().unwrap(), ColorSchemeId::Light);
        assert_eq!(config.fonts, FontsConfig::default());
    }

    #[test]
    fn load_config_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            r#"
input_dir = "photos"

[style]
color_scheme = "dark"

[output]
compression = "best"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("photos"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.color_scheme_id().unwrap(), ColorSchemeId::Dark);
        assert_eq!(config.output.compression, PngCompression::Best);
        // Unspecified values should be defaults
        assert_eq!(config.style.preset, "square-insta-compact");
    }

    #[test]
    fn load_config_missing_explicit_file_is_io_error() {
        let result = load_config(Some(Path::new("/nonexistent/polaroid.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("polaroid.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_preset_fails_validation() {
        let overlay: toml::Value = toml::from_str(
            r#"
[style]
preset = "poster"
"#,
        )
        .unwrap();
        let result = resolve_config(Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(msg)) if msg.contains("poster")));
    }

    #[test]
    fn zero_max_processes_fails_validation() {
        let overlay: toml::Value = toml::from_str("[processing]\nmax_processes = 0").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_font_path_fails_validation() {
        let overlay: toml::Value = toml::from_str("[fonts]\nmain = \"\"").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn batch_request_uses_config_values() {
        let config = PolaroidConfig {
            style: StyleConfig {
                preset: "h".into(),
                color_scheme: "D".into(),
            },
            ..PolaroidConfig::default()
        };
        let request = config.batch_request().unwrap();
        assert_eq!(request.preset, PresetId::Half);
        assert_eq!(request.color_scheme, ColorSchemeId::Dark);
        assert_eq!(request.input_dir, PathBuf::from("input"));
    }

    // =========================================================================
    // Processing / thread count
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"input_dir = "a""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"input_dir = "b""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("input_dir").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[style]\ncolor_scheme = \"dark\"").unwrap();
        let merged = merge_toml(base, overlay);

        let style = merged.get("style").unwrap();
        assert_eq!(style.get("color_scheme").unwrap().as_str(), Some("dark"));
        assert_eq!(
            style.get("preset").unwrap().as_str(),
            Some("square-insta-compact")
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<PolaroidConfig, _> = toml::from_str("[style]\npreest = \"full\"");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<PolaroidConfig, _> = toml::from_str("[colours]\nmain = 1");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_compression_rejected() {
        let result: Result<PolaroidConfig, _> = toml::from_str("[output]\ncompression = \"max\"");
        assert!(result.is_err());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: PolaroidConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, PolaroidConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[style]", "[fonts]", "[output]", "[processing]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }
}
