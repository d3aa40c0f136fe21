//! Polaroid compositing.
//!
//! Turns one decoded photo plus its metadata into a bordered, captioned
//! canvas. The work is split in two halves so geometry can be tested
//! without pixels:
//!
//! - [`plan_layout`] resolves the profile, computes backdrop, margins and
//!   canvas size, builds the caption strings and positions every text row.
//! - [`compose`] executes a plan: orientation, backdrop, margins, text.
//!
//! ## Pipeline
//!
//! ```text
//! decoded ──orientation──► upright ──backdrop?──► photo
//!         ──margins──► canvas ──captions──► RgbImage
//! ```
//!
//! Nothing here touches the filesystem except [`load_source`]. Metadata
//! never fails a composition: absent or unusable fields only shorten the
//! captions.

use crate::caption::{self, Captions};
use crate::imaging::{
    BackdropParams, BackendError, CaptionPlan, FontRole, ImageBackend, Margins, TextParams,
    add_margins, apply_orientation, backdrop_geometry, block_top, canvas_size, context_size,
    draw_caption, font_px, is_portrait, margin_pixels, row_left, synthesize_backdrop,
};
use crate::metadata::{self, PhotoMetadata};
use crate::style::{self, Alignment, Anchor, ColorScheme, StyleError, StylePreset};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Font unavailable: {0}")]
    MissingGlyphResource(String),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("Image processing failed: {0}")]
    Backend(BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BackendError> for ComposeError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::MissingGlyphResource(msg) => ComposeError::MissingGlyphResource(msg),
            other => ComposeError::Backend(other),
        }
    }
}

/// A decoded photo and the metadata read from the same bytes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub metadata: PhotoMetadata,
}

/// Decode an encoded image (JPEG, PNG, TIFF, WebP) and read its EXIF block.
pub fn decode_source(bytes: &[u8]) -> Result<SourceImage, ComposeError> {
    let image = image::load_from_memory(bytes)?;
    Ok(SourceImage {
        image,
        metadata: metadata::extract(bytes),
    })
}

/// Read a file and [`decode_source`] it.
pub fn load_source(path: &Path) -> Result<SourceImage, ComposeError> {
    let bytes = std::fs::read(path)?;
    decode_source(&bytes)
}

/// Everything [`compose`] will do, computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub is_portrait: bool,
    /// Longer side of the upright photo; every margin is a fraction of it.
    pub context_size: u32,
    /// Present only for blur presets on portrait photos.
    pub backdrop: Option<BackdropParams>,
    /// Size of the image the margins are added around (the backdrop band
    /// when there is one).
    pub photo_size: (u32, u32),
    pub margins: Margins,
    pub canvas: (u32, u32),
    pub captions: Captions,
    pub main: CaptionPlan,
    pub sub: CaptionPlan,
}

/// Compute the full layout for an upright photo of `oriented` size.
///
/// `decoded` is the size as stored in the file, before orientation; the
/// caption reports that one when the camera did not record its own.
pub fn plan_layout(
    backend: &impl ImageBackend,
    oriented: (u32, u32),
    decoded: (u32, u32),
    metadata: &PhotoMetadata,
    preset: &StylePreset,
    scheme: &ColorScheme,
) -> Result<LayoutPlan, ComposeError> {
    let (width, height) = oriented;
    let portrait = is_portrait(width, height);
    let profile = preset.profile(portrait);
    profile.validate()?;

    let context = context_size(width, height);
    let backdrop = (preset.blur_portrait_background && portrait)
        .then(|| backdrop_geometry(width, height));
    let photo_size = backdrop.map_or(oriented, |b| (b.band_width, b.stretch_height));
    let margins = margin_pixels(context, profile);
    let canvas = canvas_size(photo_size, &margins);

    let captions = caption::build(metadata, decoded, preset.compact_caption);
    let context_font_size = canvas.0.min(canvas.1);

    let main = plan_caption(
        backend,
        &captions.main,
        CaptionStyle {
            font: FontRole::Main,
            px: font_px(context_font_size, profile.caption_font_scale[0]),
            anchor: profile.caption_anchor[0],
            alignment: profile.caption_alignment[0],
            color: scheme.main_text_color,
        },
        canvas,
    )?;
    let sub = plan_caption(
        backend,
        &captions.sub,
        CaptionStyle {
            font: FontRole::Sub,
            px: font_px(context_font_size, profile.caption_font_scale[1]),
            anchor: profile.caption_anchor[1],
            alignment: profile.caption_alignment[1],
            color: scheme.sub_text_color,
        },
        canvas,
    )?;

    log::debug!(
        "{}: {}x{} {} -> canvas {}x{}{}",
        preset.id,
        width,
        height,
        if portrait { "portrait" } else { "landscape" },
        canvas.0,
        canvas.1,
        if backdrop.is_some() { " (blurred backdrop)" } else { "" },
    );

    Ok(LayoutPlan {
        is_portrait: portrait,
        context_size: context,
        backdrop,
        photo_size,
        margins,
        canvas,
        captions,
        main,
        sub,
    })
}

struct CaptionStyle {
    font: FontRole,
    px: u32,
    anchor: Anchor,
    alignment: Alignment,
    color: Rgb<u8>,
}

/// Measure every row, stack them and place the block on the canvas.
fn plan_caption(
    backend: &impl ImageBackend,
    text: &str,
    style: CaptionStyle,
    canvas: (u32, u32),
) -> Result<CaptionPlan, BackendError> {
    let px = style.px as f32;
    let measured = text
        .split('\n')
        .map(|row| {
            backend
                .measure_text(style.font, px, row)
                .map(|extent| (row, extent))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let block_height = measured.iter().map(|(_, extent)| extent.line_height).sum();
    let mut y = block_top(canvas.1, block_height, style.anchor.y);

    let rows = measured
        .into_iter()
        .map(|(row, extent)| {
            let params = TextParams {
                text: row.to_string(),
                font: style.font,
                px,
                x: row_left(canvas.0, extent.width, style.anchor.x, style.alignment),
                y,
                color: style.color,
            };
            y += extent.line_height as i32;
            params
        })
        .collect();

    Ok(CaptionPlan { rows })
}

/// Render the polaroid composite of one photo.
pub fn compose(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    metadata: &PhotoMetadata,
    preset: &StylePreset,
    scheme: &ColorScheme,
) -> Result<RgbImage, ComposeError> {
    let decoded = (image.width(), image.height());
    let upright = apply_orientation(image.to_rgb8(), metadata.orientation);
    let plan = plan_layout(
        backend,
        upright.dimensions(),
        decoded,
        metadata,
        preset,
        scheme,
    )?;

    let photo = match &plan.backdrop {
        Some(params) => synthesize_backdrop(backend, &upright, params)?,
        None => upright,
    };
    let mut canvas = add_margins(&photo, &plan.margins, scheme.background_color);
    draw_caption(backend, &mut canvas, &plan.main)?;
    draw_caption(backend, &mut canvas, &plan.sub)?;
    Ok(canvas)
}

/// [`compose`] with the preset and color scheme given by identifier.
pub fn compose_by_id(
    backend: &impl ImageBackend,
    image: &DynamicImage,
    metadata: &PhotoMetadata,
    preset_id: &str,
    scheme_id: &str,
) -> Result<RgbImage, ComposeError> {
    let preset = style::resolve(preset_id)?;
    let scheme = style::resolve_color_scheme(scheme_id)?;
    compose(backend, image, metadata, preset, scheme)
}
