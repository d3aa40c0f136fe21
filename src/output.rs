//! CLI output formatting.
//!
//! Every `format_*` function is pure and returns display lines; the
//! `print_*` wrappers write them to stdout. Tests assert on the lines.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! Rendering 3 photos
//! 001 beach.jpg → beach_full_light.png (4160x3580)
//! 003 notes.tif: failed
//!     Cannot decode image: ...
//! 002 IMG_0042.JPG → IMG_0042_full_light.png (3580x4160)
//! Rendered 2 of 3 photos
//! Failed:
//!     notes.tif: Cannot decode image: ...
//! ```
//!
//! Item lines appear as workers finish, so they are not in index order.
//!
//! ## Presets
//!
//! ```text
//! Presets
//!     full (F)                   standard caption
//!     square-insta (IS)          standard caption, blurred portrait backdrop
//! Color schemes
//!     light (L)
//!     dark (D)
//! ```

use crate::batch::{BatchEvent, BatchReport};
use crate::style::{ColorSchemeId, PresetId};
use std::path::Path;

/// Indentation for context lines.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Render
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => vec![format!("Rendering {} photos", total)],
        BatchEvent::Rendered {
            index,
            source,
            output,
            width,
            height,
        } => vec![format!(
            "{:03} {} \u{2192} {} ({}x{})",
            index,
            file_name(source),
            file_name(output),
            width,
            height
        )],
        BatchEvent::Failed {
            index,
            source,
            error,
        } => vec![
            format!("{:03} {}: failed", index, file_name(source)),
            format!("{}{}", indent(1), error),
        ],
    }
}

/// Format the end-of-batch summary.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Rendered {} of {} photos",
        report.rendered.len(),
        report.total()
    )];
    if !report.failed.is_empty() {
        lines.push("Failed:".to_string());
        for item in &report.failed {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                file_name(&item.source),
                item.error
            ));
        }
    }
    lines
}

pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}

pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Format the preset and color scheme catalogs.
pub fn format_presets() -> Vec<String> {
    let mut lines = vec!["Presets".to_string()];
    for id in PresetId::ALL {
        let preset = id.preset();
        let mut traits = vec![if preset.compact_caption {
            "compact caption"
        } else {
            "standard caption"
        }];
        if preset.blur_portrait_background {
            traits.push("blurred portrait backdrop");
        }
        let name = format!("{} ({})", id, id.alias());
        lines.push(format!("{}{:<27}{}", indent(1), name, traits.join(", ")));
    }
    lines.push("Color schemes".to_string());
    for id in ColorSchemeId::ALL {
        lines.push(format!("{}{} ({})", indent(1), id, id.alias()));
    }
    lines
}

pub fn print_presets() {
    for line in format_presets() {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{FailedItem, RenderedItem};
    use std::path::PathBuf;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_started() {
        let lines = format_batch_event(&BatchEvent::Started { total: 5 });
        assert_eq!(lines, vec!["Rendering 5 photos"]);
    }

    #[test]
    fn format_rendered_shows_index_source_and_output() {
        let event = BatchEvent::Rendered {
            index: 7,
            source: PathBuf::from("input/beach.jpg"),
            output: PathBuf::from("output/beach_full_light.png"),
            width: 4160,
            height: 3580,
        };
        let lines = format_batch_event(&event);
        assert_eq!(
            lines,
            vec!["007 beach.jpg \u{2192} beach_full_light.png (4160x3580)"]
        );
    }

    #[test]
    fn format_failed_puts_error_on_context_line() {
        let event = BatchEvent::Failed {
            index: 2,
            source: PathBuf::from("input/broken.jpg"),
            error: "Cannot decode image: bad header".to_string(),
        };
        let lines = format_batch_event(&event);
        assert_eq!(lines[0], "002 broken.jpg: failed");
        assert_eq!(lines[1], "    Cannot decode image: bad header");
    }

    #[test]
    fn summary_without_failures_is_one_line() {
        let report = BatchReport {
            rendered: vec![RenderedItem {
                source: PathBuf::from("a.png"),
                output: PathBuf::from("out/a_full_light.png"),
                preset: PresetId::Full,
                color_scheme: ColorSchemeId::Light,
                width: 10,
                height: 12,
            }],
            failed: vec![],
        };
        assert_eq!(format_batch_summary(&report), vec!["Rendered 1 of 1 photos"]);
    }

    #[test]
    fn summary_lists_failures() {
        let report = BatchReport {
            rendered: vec![],
            failed: vec![FailedItem {
                source: PathBuf::from("in/x.tif"),
                error: "IO error: denied".to_string(),
            }],
        };
        let lines = format_batch_summary(&report);
        assert_eq!(lines[0], "Rendered 0 of 1 photos");
        assert_eq!(lines[1], "Failed:");
        assert_eq!(lines[2], "    x.tif: IO error: denied");
    }

    #[test]
    fn presets_list_every_preset_and_scheme() {
        let lines = format_presets();
        assert_eq!(lines.len(), 1 + PresetId::ALL.len() + 1 + ColorSchemeId::ALL.len());
        assert_eq!(lines[0], "Presets");
        assert!(lines[1].starts_with("    full (F)"));
        assert!(lines.iter().any(|l| l.contains("square-insta-compact (ISC)")
            && l.contains("compact caption, blurred portrait backdrop")));
        assert_eq!(lines[9], "Color schemes");
        assert_eq!(lines[10], "    light (L)");
        assert_eq!(lines[11], "    dark (D)");
    }
}
