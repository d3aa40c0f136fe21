//! Pure geometry for the polaroid layout.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{BackdropParams, Margins};
use crate::style::{Alignment, GeometryProfile};

/// Blur strength of the portrait backdrop, independent of image size.
pub const BACKDROP_SIGMA: f32 = 200.0;

/// Portrait means strictly taller than wide; squares are landscape.
pub fn is_portrait(width: u32, height: u32) -> bool {
    height > width
}

/// The longer side, the reference for every margin.
pub fn context_size(width: u32, height: u32) -> u32 {
    width.max(height)
}

/// Convert the profile's margin fractions into pixels.
///
/// # Examples
/// ```
/// # use polaroid::imaging::margin_pixels;
/// # use polaroid::style::PresetId;
/// let m = margin_pixels(4000, &PresetId::Full.preset().landscape);
/// assert_eq!((m.top, m.bottom), (80, 500));
/// ```
pub fn margin_pixels(context_size: u32, profile: &GeometryProfile) -> Margins {
    let px = |fraction: f64| (f64::from(context_size) * fraction).round() as u32;
    Margins {
        top: px(profile.margin_top),
        right: px(profile.margin_right),
        bottom: px(profile.margin_bottom),
        left: px(profile.margin_left),
    }
}

/// Size of the bordered canvas.
pub fn canvas_size(photo: (u32, u32), margins: &Margins) -> (u32, u32) {
    (
        photo.0 + margins.left + margins.right,
        photo.1 + margins.top + margins.bottom,
    )
}

/// Caption pixel size: the canvas' shorter side divided by the profile scale.
pub fn font_px(context_font_size: u32, scale: f64) -> u32 {
    ((f64::from(context_font_size) / scale).floor() as u32).max(1)
}

/// Backdrop geometry for a `width × height` portrait photo.
///
/// The blurred copy is stretched to `2H × H`; the band `[0.4H, 1.6H)` is
/// kept, giving a `1.2H × H` canvas with the sharp photo centered on it.
pub fn backdrop_geometry(width: u32, height: u32) -> BackdropParams {
    let h = u64::from(height);
    let band_x = (h * 2 / 5) as u32;
    let band_width = (h * 6 / 5) as u32;
    BackdropParams {
        sigma: BACKDROP_SIGMA,
        stretch_width: height.saturating_mul(2),
        stretch_height: height,
        band_x,
        band_width,
        paste_x: band_width.saturating_sub(width) / 2,
    }
}

/// Top edge of a text block of `block_height` placed at `v_fraction` of the
/// free vertical space.
pub fn block_top(canvas_height: u32, block_height: u32, v_fraction: f64) -> i32 {
    ((f64::from(canvas_height) - f64::from(block_height)) * v_fraction).round() as i32
}

/// Left edge of a row whose anchor column sits at `h_fraction` of the canvas.
///
/// The alignment decides which point of the row touches the anchor: its left
/// edge, its right edge or its center.
pub fn row_left(canvas_width: u32, row_width: u32, h_fraction: f64, alignment: Alignment) -> i32 {
    let anchor = f64::from(canvas_width) * h_fraction;
    let width = f64::from(row_width);
    let x = match alignment {
        Alignment::Left => anchor,
        Alignment::Right => anchor - width,
        Alignment::Center => anchor - width / 2.0,
    };
    x.round() as i32
}
