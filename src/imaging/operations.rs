//! High-level image operations.
//!
//! These functions combine computed parameters with backend execution.
//! Pixel copies (orientation, margins, crop, paste) are done here with
//! `image::imageops`; anything that needs a filter or a font goes through
//! the [`ImageBackend`].

use super::backend::{BackendError, ImageBackend};
use super::params::{BackdropParams, CaptionPlan, Margins};
use image::{Rgb, RgbImage, imageops};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Apply an EXIF orientation code so the photo displays upright.
///
/// Codes 2 to 8 mirror and/or rotate; 1, unknown codes and `None` leave the
/// image untouched.
pub fn apply_orientation(image: RgbImage, orientation: Option<u16>) -> RgbImage {
    match orientation {
        Some(2) => imageops::flip_horizontal(&image),
        Some(3) => imageops::rotate180(&image),
        Some(4) => imageops::flip_vertical(&image),
        Some(5) => imageops::flip_horizontal(&imageops::rotate90(&image)),
        Some(6) => imageops::rotate90(&image),
        Some(7) => imageops::flip_horizontal(&imageops::rotate270(&image)),
        Some(8) => imageops::rotate270(&image),
        _ => image,
    }
}

/// Copy `photo` onto a canvas grown by `margins` and filled with `fill`.
pub fn add_margins(photo: &RgbImage, margins: &Margins, fill: Rgb<u8>) -> RgbImage {
    let width = photo.width() + margins.left + margins.right;
    let height = photo.height() + margins.top + margins.bottom;
    let mut canvas = RgbImage::from_pixel(width, height, fill);
    imageops::replace(
        &mut canvas,
        photo,
        i64::from(margins.left),
        i64::from(margins.top),
    );
    canvas
}

/// Build the blurred backdrop of a portrait photo and paste the sharp photo
/// on top of it.
pub fn synthesize_backdrop(
    backend: &impl ImageBackend,
    photo: &RgbImage,
    params: &BackdropParams,
) -> Result<RgbImage> {
    let blurred = backend.blur(photo, params.sigma)?;
    let stretched = backend.resize(&blurred, params.stretch_width, params.stretch_height)?;
    let mut band = imageops::crop_imm(
        &stretched,
        params.band_x,
        0,
        params.band_width,
        params.stretch_height,
    )
    .to_image();
    imageops::replace(&mut band, photo, i64::from(params.paste_x), 0);
    Ok(band)
}

/// Draw every row of a caption. Blank rows only occupy space.
pub fn draw_caption(
    backend: &impl ImageBackend,
    canvas: &mut RgbImage,
    plan: &CaptionPlan,
) -> Result<()> {
    for row in plan.rows.iter().filter(|row| !row.text.trim().is_empty()) {
        backend.draw_text(canvas, row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::backend::tests::{MockBackend, RecordedOp};
    use super::super::calculations::backdrop_geometry;
    use super::super::params::{FontRole, TextParams};
    use super::*;

    const RED: Rgb<u8> = Rgb([200, 10, 10]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    /// 3×2 image with a distinct value in every pixel.
    fn numbered() -> RgbImage {
        RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn orientation_none_and_one_are_identity() {
        assert_eq!(apply_orientation(numbered(), None), numbered());
        assert_eq!(apply_orientation(numbered(), Some(1)), numbered());
        assert_eq!(apply_orientation(numbered(), Some(42)), numbered());
    }

    #[test]
    fn orientation_six_rotates_clockwise() {
        let rotated = apply_orientation(numbered(), Some(6));
        assert_eq!(rotated.dimensions(), (2, 3));
        // The old bottom-left corner ends up top-left.
        assert_eq!(*rotated.get_pixel(0, 0), Rgb([0, 1, 0]));
    }

    #[test]
    fn orientation_eight_rotates_counter_clockwise() {
        let rotated = apply_orientation(numbered(), Some(8));
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(*rotated.get_pixel(0, 0), Rgb([2, 0, 0]));
    }

    #[test]
    fn orientation_five_and_seven_transpose() {
        let transposed = apply_orientation(numbered(), Some(5));
        assert_eq!(*transposed.get_pixel(1, 2), Rgb([2, 1, 0]));

        let transversed = apply_orientation(numbered(), Some(7));
        assert_eq!(*transversed.get_pixel(0, 0), Rgb([2, 1, 0]));
    }

    #[test]
    fn orientation_mirrors_keep_size() {
        for code in [2, 3, 4] {
            assert_eq!(apply_orientation(numbered(), Some(code)).dimensions(), (3, 2));
        }
        assert_eq!(
            *apply_orientation(numbered(), Some(2)).get_pixel(0, 0),
            Rgb([2, 0, 0])
        );
    }

    #[test]
    fn add_margins_fills_border_with_background() {
        let photo = RgbImage::from_pixel(4, 3, RED);
        let margins = Margins {
            top: 1,
            right: 2,
            bottom: 5,
            left: 3,
        };

        let canvas = add_margins(&photo, &margins, WHITE);

        assert_eq!(canvas.dimensions(), (9, 9));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            let inside = (3..7).contains(&x) && (1..4).contains(&y);
            assert_eq!(*pixel, if inside { RED } else { WHITE }, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn backdrop_blurs_stretches_and_centers_photo() {
        let backend = MockBackend::new();
        let photo = RgbImage::from_pixel(6, 10, RED);
        let params = backdrop_geometry(6, 10);

        let band = synthesize_backdrop(&backend, &photo, &params).unwrap();

        assert_eq!(band.dimensions(), (12, 10));
        assert_eq!(*band.get_pixel(3, 5), RED);
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Blur {
                    width: 6,
                    height: 10,
                    sigma: params.sigma
                },
                RecordedOp::Resize {
                    from: (6, 10),
                    to: (20, 10)
                },
            ]
        );
    }

    #[test]
    fn draw_caption_skips_blank_rows() {
        let backend = MockBackend::new();
        let mut canvas = RgbImage::new(10, 10);
        let row = |text: &str| TextParams {
            text: text.to_string(),
            font: FontRole::Sub,
            px: 4.0,
            x: 1,
            y: 2,
            color: WHITE,
        };
        let plan = CaptionPlan {
            rows: vec![row("ISO100"), row(" "), row("")],
        };

        draw_caption(&backend, &mut canvas, &plan).unwrap();

        assert_eq!(backend.drawn_text(), vec!["ISO100".to_string()]);
    }

    #[test]
    fn draw_caption_propagates_font_errors() {
        let backend = MockBackend::without_fonts();
        let mut canvas = RgbImage::new(10, 10);
        let plan = CaptionPlan {
            rows: vec![TextParams {
                text: "Canon".into(),
                font: FontRole::Main,
                px: 4.0,
                x: 0,
                y: 0,
                color: WHITE,
            }],
        };

        let result = draw_caption(&backend, &mut canvas, &plan);
        assert!(matches!(result, Err(BackendError::MissingGlyphResource(_))));
    }
}
