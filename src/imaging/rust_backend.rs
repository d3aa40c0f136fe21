//! Pure Rust imaging backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Blur | `image::imageops::fast_blur` (box-blur approximation of a Gaussian) |
//! | Resize | `image::imageops::resize` with `Triangle` filter |
//! | Measure text | `imageproc::drawing::text_size` + `ab_glyph` vertical metrics |
//! | Draw text | `imageproc::drawing::draw_text_mut` |
//!
//! Caption sizes are em sizes in pixels: `ab_glyph`'s `pt_to_px_scale`
//! turns the em size into the glyph-height scale the rasterizer expects.

use super::backend::{BackendError, ImageBackend};
use super::params::{FontRole, TextExtent, TextParams};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::RgbImage;
use image::imageops::FilterType;
use std::path::Path;

/// File extensions the batch driver picks up.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

/// Backend using the `image` / `imageproc` / `ab_glyph` stack.
///
/// Holds the two caption faces; fonts are parsed once and shared by every
/// composition.
pub struct RustBackend {
    main_font: FontArc,
    sub_font: FontArc,
}

impl RustBackend {
    pub fn new(main_font: FontArc, sub_font: FontArc) -> Self {
        Self {
            main_font,
            sub_font,
        }
    }

    /// Parse both faces from in-memory TrueType/OpenType data.
    pub fn from_font_bytes(main: Vec<u8>, sub: Vec<u8>) -> Result<Self, BackendError> {
        Ok(Self::new(parse_font(main, "main")?, parse_font(sub, "sub")?))
    }

    /// Load both faces from disk.
    ///
    /// A missing or unparsable file is a [`BackendError::MissingGlyphResource`].
    pub fn from_font_files(main: &Path, sub: &Path) -> Result<Self, BackendError> {
        Self::from_font_bytes(read_font(main)?, read_font(sub)?)
    }

    fn font(&self, role: FontRole) -> &FontArc {
        match role {
            FontRole::Main => &self.main_font,
            FontRole::Sub => &self.sub_font,
        }
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>, BackendError> {
    std::fs::read(path).map_err(|e| {
        BackendError::MissingGlyphResource(format!("{}: {e}", path.display()))
    })
}

fn parse_font(data: Vec<u8>, role: &str) -> Result<FontArc, BackendError> {
    FontArc::try_from_vec(data)
        .map_err(|e| BackendError::MissingGlyphResource(format!("{role} font: {e}")))
}

/// Scale for an em size of `px` pixels.
fn px_scale(font: &FontArc, px: f32) -> PxScale {
    font.pt_to_px_scale(px).unwrap_or(PxScale::from(px))
}

impl ImageBackend for RustBackend {
    fn blur(&self, image: &RgbImage, sigma: f32) -> Result<RgbImage, BackendError> {
        Ok(image::imageops::fast_blur(image, sigma))
    }

    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> Result<RgbImage, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        Ok(image::imageops::resize(
            image,
            width,
            height,
            FilterType::Triangle,
        ))
    }

    fn measure_text(
        &self,
        font: FontRole,
        px: f32,
        text: &str,
    ) -> Result<TextExtent, BackendError> {
        let face = self.font(font);
        let scale = px_scale(face, px);
        let (width, _) = imageproc::drawing::text_size(scale, face, text);
        let scaled = face.as_scaled(scale);
        Ok(TextExtent {
            width,
            line_height: (scaled.height() + scaled.line_gap()).ceil() as u32,
        })
    }

    fn draw_text(&self, canvas: &mut RgbImage, params: &TextParams) -> Result<(), BackendError> {
        let face = self.font(params.font);
        imageproc::drawing::draw_text_mut(
            canvas,
            params.color,
            params.x,
            params.y,
            px_scale(face, params.px),
            face,
            &params.text,
        );
        Ok(())
    }
}
