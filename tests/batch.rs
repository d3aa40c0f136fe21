//! End-to-end batch rendering through the public API.
//!
//! Uses a deterministic backend that draws every caption row as a solid
//! box of the text color, so output pixels can be checked without fonts.

use image::{Rgb, RgbImage};
use polaroid::batch::{BatchEvent, BatchRequest, PngCompression, render_batch};
use polaroid::imaging::{BackendError, FontRole, ImageBackend, TextExtent, TextParams};
use polaroid::style::{ColorScheme, ColorSchemeId, PresetId};
use std::path::Path;
use tempfile::TempDir;

const PHOTO: Rgb<u8> = Rgb([40, 120, 200]);
const GLYPH_WIDTH: u32 = 4;

struct BoxTextBackend;

impl ImageBackend for BoxTextBackend {
    fn blur(&self, image: &RgbImage, _sigma: f32) -> Result<RgbImage, BackendError> {
        Ok(image.clone())
    }

    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> Result<RgbImage, BackendError> {
        Ok(image::imageops::resize(
            image,
            width,
            height,
            image::imageops::FilterType::Nearest,
        ))
    }

    fn measure_text(
        &self,
        _font: FontRole,
        px: f32,
        text: &str,
    ) -> Result<TextExtent, BackendError> {
        Ok(TextExtent {
            width: text.chars().count() as u32 * GLYPH_WIDTH,
            line_height: px.ceil() as u32,
        })
    }

    fn draw_text(&self, canvas: &mut RgbImage, params: &TextParams) -> Result<(), BackendError> {
        let width = params.text.chars().count() as i32 * GLYPH_WIDTH as i32;
        let height = params.px.ceil() as i32;
        for y in params.y.max(0)..(params.y + height).min(canvas.height() as i32) {
            for x in params.x.max(0)..(params.x + width).min(canvas.width() as i32) {
                canvas.put_pixel(x as u32, y as u32, params.color);
            }
        }
        Ok(())
    }
}

fn write_photo(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, PHOTO).save(path).unwrap();
}

fn request(
    input: &Path,
    output: &Path,
    preset: PresetId,
    scheme: ColorSchemeId,
) -> BatchRequest {
    BatchRequest {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        preset,
        color_scheme: scheme,
        compression: PngCompression::Best,
    }
}

#[test]
fn full_dark_landscape_has_border_photo_and_caption() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_photo(&input.path().join("street.png"), 300, 200);

    let report = render_batch(
        &BoxTextBackend,
        &request(input.path(), output.path(), PresetId::Full, ColorSchemeId::Dark),
        None,
    )
    .unwrap();

    assert!(report.is_success());
    let item = &report.rendered[0];
    assert_eq!(item.output, output.path().join("street_full_dark.png"));

    let rendered = image::open(&item.output).unwrap().to_rgb8();
    // 300 px context: 6 px sides and top, 38 px bottom.
    assert_eq!(rendered.dimensions(), (312, 244));
    assert_eq!(*rendered.get_pixel(0, 0), ColorScheme::DARK.background_color);
    assert_eq!(*rendered.get_pixel(156, 106), PHOTO);

    // No EXIF: the main caption is empty and the sub caption is drawn in gray
    // inside the bottom border.
    let caption_pixels = rendered
        .enumerate_pixels()
        .filter(|(_, y, p)| *y >= 206 && **p == ColorScheme::DARK.sub_text_color)
        .count();
    assert!(caption_pixels > 0);
    assert!(
        !rendered
            .pixels()
            .any(|p| *p == ColorScheme::DARK.main_text_color)
    );
}

#[test]
fn square_insta_portrait_becomes_square() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_photo(&input.path().join("tall.png"), 200, 300);
    write_photo(&input.path().join("wide.png"), 300, 200);

    let report = render_batch(
        &BoxTextBackend,
        &request(
            input.path(),
            output.path(),
            PresetId::SquareInsta,
            ColorSchemeId::Light,
        ),
        None,
    )
    .unwrap();

    assert_eq!(report.rendered.len(), 2);
    let tall = &report.rendered[0];
    assert!(tall.source.ends_with("tall.png"));
    assert_eq!((tall.width, tall.height), (360, 360));

    let wide = &report.rendered[1];
    assert_ne!(wide.width, wide.height);
}

#[test]
fn failures_are_isolated_and_streamed() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_photo(&input.path().join("01.png"), 64, 48);
    std::fs::write(input.path().join("02.jpg"), b"truncated").unwrap();
    write_photo(&input.path().join("03.png"), 48, 64);
    std::fs::write(input.path().join("readme.md"), b"# photos").unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    let report = render_batch(
        &BoxTextBackend,
        &request(
            input.path(),
            output.path(),
            PresetId::HalfCompact,
            ColorSchemeId::Light,
        ),
        Some(tx),
    )
    .unwrap();

    assert_eq!(report.rendered.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].source.ends_with("02.jpg"));
    assert!(output.path().join("01_half-compact_light.png").exists());
    assert!(output.path().join("03_half-compact_light.png").exists());
    assert!(!output.path().join("02_half-compact_light.png").exists());

    let events: Vec<_> = rx.iter().collect();
    assert!(matches!(events[0], BatchEvent::Started { total: 3 }));
    let failed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Failed { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec![2]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rendered"].as_array().unwrap().len(), 2);
    assert_eq!(json["rendered"][0]["preset"], "half-compact");
    assert_eq!(json["rendered"][0]["color_scheme"], "light");
    assert!(json["failed"][0]["error"].as_str().unwrap().contains("decode"));
}
