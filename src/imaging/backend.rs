//! Imaging backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four raster operations the layout
//! engine cannot do with plain buffer copies: blur, resize, text measuring
//! and text drawing. Margin insertion, cropping and pasting are plain
//! `image::imageops` calls in [`operations`](super::operations).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): `image` for pixels,
//! `imageproc` + `ab_glyph` for text.

use super::params::{FontRole, TextExtent, TextParams};
use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Font unavailable: {0}")]
    MissingGlyphResource(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for imaging backends.
///
/// Backends are shared read-only across the batch workers, hence `Sync`.
pub trait ImageBackend: Sync {
    /// Gaussian blur with the given standard deviation.
    fn blur(&self, image: &RgbImage, sigma: f32) -> Result<RgbImage, BackendError>;

    /// Resize to exactly `width × height`, ignoring the aspect ratio.
    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> Result<RgbImage, BackendError>;

    /// Measure a single row of text.
    fn measure_text(&self, font: FontRole, px: f32, text: &str)
    -> Result<TextExtent, BackendError>;

    /// Draw a single row of text with its top-left corner at `(x, y)`.
    fn draw_text(&self, canvas: &mut RgbImage, params: &TextParams) -> Result<(), BackendError>;
}
