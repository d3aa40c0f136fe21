//! Image processing: pure Rust, `image` + `imageproc` + `ab_glyph`.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Orientation** | `imageops::rotate*` / `flip_*` |
//! | **Margins** | `RgbImage::from_pixel` + `imageops::replace` |
//! | **Backdrop** | `fast_blur` → `resize` → `crop_imm` → `replace` |
//! | **Captions** | `imageproc::drawing::draw_text_mut` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for layout math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining parameters + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    BACKDROP_SIGMA, backdrop_geometry, block_top, canvas_size, context_size, font_px,
    is_portrait, margin_pixels, row_left,
};
pub use operations::{add_margins, apply_orientation, draw_caption, synthesize_backdrop};
pub use params::{BackdropParams, CaptionPlan, FontRole, Margins, TextExtent, TextParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
