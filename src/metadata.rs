//! Camera metadata extraction.
//!
//! [`PhotoMetadata`] is a fixed record of the EXIF fields the captions use.
//! Every field is optional and kept as text exactly as it will be shown (or
//! parsed) by [`caption`](crate::caption); absent tags stay `None` and are
//! never replaced by placeholder text.
//!
//! ## Tag sources
//!
//! Several fields have more than one candidate tag. The first present,
//! non-empty value wins:
//!
//! | Field | Tags (priority order) |
//! |---|---|
//! | `make` | `Make` |
//! | `model` | `Model` |
//! | `date_time` | `DateTimeOriginal`, `DateTime` |
//! | `pixel_width` | `ImageWidth`, `PixelXDimension` |
//! | `pixel_height` | `ImageLength`, `PixelYDimension` |
//! | `focal_length` | `FocalLength` |
//! | `max_aperture` | `MaxApertureValue` (APEX, converted to an f-number), `FNumber` |
//! | `iso` | `PhotographicSensitivity` (a.k.a. `ISOSpeedRatings`) |
//! | `exposure_time` | `ExposureTime` (kept as `num/denom`) |
//! | `orientation` | `Orientation` |
//!
//! Images without an EXIF block produce [`PhotoMetadata::default()`].

use exif::{Exif, In, Tag, Value};
use std::io::Cursor;

/// EXIF-derived fields used for captions and orientation correction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoMetadata {
    pub make: Option<String>,
    pub model: Option<String>,
    /// Raw EXIF timestamp, `YYYY:MM:DD HH:MM:SS`.
    pub date_time: Option<String>,
    pub pixel_width: Option<String>,
    pub pixel_height: Option<String>,
    pub focal_length: Option<String>,
    /// Maximum aperture as an f-number, e.g. `"2.8"`.
    pub max_aperture: Option<String>,
    pub iso: Option<String>,
    /// Exposure in seconds, either decimal (`"0.004"`) or rational (`"1/250"`).
    pub exposure_time: Option<String>,
    /// EXIF orientation code (1-8).
    pub orientation: Option<u16>,
}

impl PhotoMetadata {
    /// Pixel dimensions reported by the camera, when both parse as integers.
    pub fn pixel_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.pixel_width.as_deref()?.trim().parse().ok()?;
        let height = self.pixel_height.as_deref()?.trim().parse().ok()?;
        Some((width, height))
    }
}

/// Extract metadata from an encoded image file.
///
/// Returns an empty record when the container carries no EXIF block or the
/// block cannot be parsed.
pub fn extract(bytes: &[u8]) -> PhotoMetadata {
    match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => from_exif(&exif),
        Err(e) => {
            log::debug!("no usable EXIF block: {e}");
            PhotoMetadata::default()
        }
    }
}

fn from_exif(exif: &Exif) -> PhotoMetadata {
    PhotoMetadata {
        make: text(exif, Tag::Make),
        model: text(exif, Tag::Model),
        date_time: first_present([
            text(exif, Tag::DateTimeOriginal),
            text(exif, Tag::DateTime),
        ]),
        pixel_width: first_present([
            integer(exif, Tag::ImageWidth),
            integer(exif, Tag::PixelXDimension),
        ]),
        pixel_height: first_present([
            integer(exif, Tag::ImageLength),
            integer(exif, Tag::PixelYDimension),
        ]),
        focal_length: decimal(exif, Tag::FocalLength),
        max_aperture: first_present([
            rational(exif, Tag::MaxApertureValue)
                .map(|apex| format_decimal(apex_to_f_number(apex))),
            decimal(exif, Tag::FNumber),
        ]),
        iso: integer(exif, Tag::PhotographicSensitivity),
        exposure_time: fraction(exif, Tag::ExposureTime),
        orientation: exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .and_then(|v| u16::try_from(v).ok()),
    }
}

/// First non-empty candidate.
fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn text(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(parts) => {
            let raw = parts.first()?;
            let s = String::from_utf8_lossy(raw);
            let s = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}

fn integer(exif: &Exif, tag: Tag) -> Option<String> {
    exif.get_field(tag, In::PRIMARY)?
        .value
        .get_uint(0)
        .map(|v| v.to_string())
}

fn rational(exif: &Exif, tag: Tag) -> Option<f64> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(values) => values
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| r.to_f64()),
        _ => None,
    }
}

fn decimal(exif: &Exif, tag: Tag) -> Option<String> {
    rational(exif, tag).map(format_decimal)
}

/// Keep exposure as an exact fraction so very short shutter speeds survive.
fn fraction(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(values) => values.first().map(|r| format!("{}/{}", r.num, r.denom)),
        _ => None,
    }
}

/// APEX aperture value to f-number: `N = 2^(Av / 2)`.
fn apex_to_f_number(apex: f64) -> f64 {
    2f64.powf(apex / 2.0)
}

/// Render with at most one decimal, dropping a trailing `.0`.
pub(crate) fn format_decimal(value: f64) -> String {
    let s = format!("{value:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}
