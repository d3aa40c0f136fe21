//! Caption text built from camera metadata.
//!
//! Two rule sets exist, selected by [`StylePreset::compact_caption`](crate::style::StylePreset):
//!
//! ```text
//! standard  main: Canon Eos R5   |   Fri, 12-Jan-2024  16:44:20
//!           sub:  12.0MP   4000x3000   f/2.8   1/250s   50mm   ISO400
//!
//! compact   main: Canon Eos R5
//!           sub:  12.0MP   4000x3000   f/2.8   1/250s   50mm   ISO400
//!                 Fri, 12-Jan-2024  16:44:20
//! ```
//!
//! The compact sub caption always has exactly two rows: when no date is
//! known the second row is a single space, so every composite of a batch
//! keeps the same vertical rhythm.
//!
//! Optional clauses are skipped when their field is absent. A field that is
//! present but unusable (a non-numeric or zero exposure, a malformed
//! timestamp) raises a [`FieldError`] that is logged and recovered here by
//! dropping the clause; it never reaches the caller.

use crate::metadata::PhotoMetadata;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Spacing between sub caption clauses.
const CLAUSE_SEPARATOR: &str = "   ";
/// Spacing around the bar between camera and date on the standard main caption.
const DATE_SEPARATOR: &str = "   |   ";
/// Second compact row when no date is known.
pub const COMPACT_PLACEHOLDER: &str = " ";

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const DISPLAY_DATE_FORMAT: &str = "%a, %d-%b-%Y  %H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field}: '{value}' must be positive")]
    NotPositive { field: &'static str, value: String },
    #[error("{field}: '{value}' is too long for a 1/N shutter speed")]
    NoReciprocal { field: &'static str, value: String },
    #[error("{field}: '{value}' is not an EXIF timestamp")]
    BadTimestamp { field: &'static str, value: String },
}

/// The two caption strings of a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captions {
    pub main: String,
    /// May contain `\n`: each row is drawn on its own line.
    pub sub: String,
}

/// Build both captions.
///
/// `decoded` is the pixel size of the decoded source, used when the camera
/// did not record its own pixel dimensions.
pub fn build(metadata: &PhotoMetadata, decoded: (u32, u32), compact: bool) -> Captions {
    if compact {
        compact_captions(metadata, decoded)
    } else {
        standard_captions(metadata, decoded)
    }
}

fn standard_captions(metadata: &PhotoMetadata, decoded: (u32, u32)) -> Captions {
    let camera = camera_line(metadata);
    let main = match recovered(date_clause(metadata)) {
        Some(date) if camera.is_empty() => date,
        Some(date) => format!("{camera}{DATE_SEPARATOR}{date}"),
        None => camera,
    };
    Captions {
        main,
        sub: exposure_line(metadata, decoded),
    }
}

fn compact_captions(metadata: &PhotoMetadata, decoded: (u32, u32)) -> Captions {
    let second_row =
        recovered(date_clause(metadata)).unwrap_or_else(|| COMPACT_PLACEHOLDER.to_string());
    Captions {
        main: camera_line(metadata),
        sub: format!("{}\n{second_row}", exposure_line(metadata, decoded)),
    }
}

/// `Make Model`, title-cased; whichever is present when only one is.
fn camera_line(metadata: &PhotoMetadata) -> String {
    let parts: Vec<&str> = [metadata.make.as_deref(), metadata.model.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    title_case(&parts.join(" "))
}

/// Megapixels, dimensions and the optional exposure clauses.
fn exposure_line(metadata: &PhotoMetadata, decoded: (u32, u32)) -> String {
    let (width, height) = metadata
        .pixel_dimensions()
        .unwrap_or((u64::from(decoded.0), u64::from(decoded.1)));
    let megapixels = width as f64 * height as f64 / 1_000_000.0;

    let mut clauses = vec![format!("{megapixels:.1}MP"), format!("{width}x{height}")];

    if let Some(aperture) = present(&metadata.max_aperture) {
        clauses.push(format!("f/{aperture}"));
    }
    if let Some(shutter) = recovered(shutter_clause(metadata)) {
        clauses.push(shutter);
    }
    if let Some(focal) = present(&metadata.focal_length) {
        clauses.push(format!("{focal}mm"));
    }
    if let Some(iso) = present(&metadata.iso) {
        clauses.push(format!("ISO{iso}"));
    }

    clauses.join(CLAUSE_SEPARATOR)
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Log and drop a clause whose field could not be used.
fn recovered(clause: Result<Option<String>, FieldError>) -> Option<String> {
    clause.unwrap_or_else(|e| {
        log::debug!("caption clause omitted: {e}");
        None
    })
}

fn date_clause(metadata: &PhotoMetadata) -> Result<Option<String>, FieldError> {
    let Some(raw) = present(&metadata.date_time) else {
        return Ok(None);
    };
    format_date(raw).map(Some)
}

/// Reformat an EXIF timestamp as `Fri, 12-Jan-2024  16:44:20`.
pub fn format_date(raw: &str) -> Result<String, FieldError> {
    let cleaned = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(cleaned, EXIF_DATE_FORMAT)
        .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
        .map_err(|_| FieldError::BadTimestamp {
            field: "date_time",
            value: raw.to_string(),
        })
}

fn shutter_clause(metadata: &PhotoMetadata) -> Result<Option<String>, FieldError> {
    let Some(raw) = present(&metadata.exposure_time) else {
        return Ok(None);
    };
    shutter_denominator(raw).map(|denominator| Some(format!("1/{denominator}s")))
}

/// Reciprocal shutter speed, truncated: `0.004` and `1/250` both give `250`.
///
/// Exposures longer than a second truncate to zero and are rejected.
pub fn shutter_denominator(raw: &str) -> Result<u64, FieldError> {
    let not_a_number = || FieldError::NotANumber {
        field: "exposure_time",
        value: raw.to_string(),
    };
    let seconds = match raw.split_once('/') {
        Some((num, denom)) => {
            let num: f64 = num.trim().parse().map_err(|_| not_a_number())?;
            let denom: f64 = denom.trim().parse().map_err(|_| not_a_number())?;
            num / denom
        }
        None => raw.trim().parse::<f64>().map_err(|_| not_a_number())?,
    };
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(FieldError::NotPositive {
            field: "exposure_time",
            value: raw.to_string(),
        });
    }
    // The epsilon keeps 1/3 at 3 despite float error.
    let denominator = (1.0 / seconds + 1e-9).trunc();
    if denominator < 1.0 {
        return Err(FieldError::NoReciprocal {
            field: "exposure_time",
            value: raw.to_string(),
        });
    }
    Ok(denominator as u64)
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `EOS R5` becomes
/// `Eos R5` and `d-lux` becomes `D-Lux`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
