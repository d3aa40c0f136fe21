//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. The layout
//! engine computes them from a preset and the photo's size; the
//! [`backend`](super::backend) executes them. Keeping them plain data lets
//! tests assert on a full plan without rendering a single pixel.
//!
//! ## Types
//!
//! - [`Margins`]: border thickness in pixels on each side.
//! - [`BackdropParams`]: blur sigma, stretch size and band crop of the portrait backdrop.
//! - [`FontRole`]: which of the two caption fonts a row uses.
//! - [`TextExtent`]: measured width and line advance of one row.
//! - [`TextParams`]: one positioned row of caption text.
//! - [`CaptionPlan`]: all rows of one caption.

use image::Rgb;

/// Border thickness in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Portrait backdrop synthesis: blur, stretch to `stretch_width × stretch_height`,
/// crop `band_width` columns starting at `band_x`, paste the sharp photo at `paste_x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropParams {
    pub sigma: f32,
    pub stretch_width: u32,
    pub stretch_height: u32,
    pub band_x: u32,
    pub band_width: u32,
    pub paste_x: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Bold face of the camera caption.
    Main,
    /// Regular face of the exposure caption.
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    /// Vertical distance between the tops of two consecutive rows.
    pub line_height: u32,
}

/// A single row of text at an absolute canvas position (top-left corner).
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub text: String,
    pub font: FontRole,
    pub px: f32,
    pub x: i32,
    pub y: i32,
    pub color: Rgb<u8>,
}

/// Every row of one caption, top to bottom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptionPlan {
    pub rows: Vec<TextParams>,
}
