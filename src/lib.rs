//! # Polaroid
//!
//! Renders photographs as polaroid-style composites: a colored border, one
//! or two caption lines built from the camera's EXIF data and, for the
//! square Instagram presets, a blurred backdrop that widens portrait photos
//! into a square frame.
//!
//! # Architecture: Plan, Then Render
//!
//! Every composite goes through the same steps:
//!
//! ```text
//! 1. Decode    bytes      →  DynamicImage + PhotoMetadata
//! 2. Plan      size+meta  →  LayoutPlan     (margins, canvas, backdrop, caption rows)
//! 3. Render    plan       →  RgbImage       (orientation, backdrop, border, text)
//! 4. Encode    RgbImage   →  PNG            (batch driver only)
//! ```
//!
//! Planning is pure arithmetic on sizes plus text measurement, so layout
//! rules are unit tested without allocating a single pixel. Rendering only
//! executes a plan through an [`imaging::ImageBackend`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`style`] | Static preset and color scheme catalog, identifier parsing |
//! | [`metadata`] | EXIF extraction into a flat record of optional text fields |
//! | [`caption`] | Main and sub caption strings from metadata |
//! | [`compose`] | Layout planning and single-image compositing |
//! | [`imaging`] | Layout math, backend trait, `image`/`imageproc` backend |
//! | [`batch`] | Parallel directory rendering with progress events |
//! | [`config`] | `polaroid.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Geometry Relative to the Photo
//!
//! Margins are fractions of the photo's longer side and caption sizes are
//! fractions of the canvas' shorter side, so a preset looks the same on a
//! 12 MP phone shot and a 45 MP raw export.
//!
//! ## Metadata Never Fails a Render
//!
//! Cameras write EXIF inconsistently. Missing fields drop their caption
//! clause; malformed ones are logged at debug level and dropped too. Only
//! undecodable pixels, missing fonts and invalid geometry are errors.
//!
//! ## Fonts Are Configuration
//!
//! No font is compiled in. The two caption faces are loaded once from the
//! paths in `polaroid.toml` and shared read-only by all workers.

pub mod batch;
pub mod caption;
pub mod compose;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod style;

pub use compose::{
    ComposeError, LayoutPlan, SourceImage, compose, compose_by_id, decode_source, load_source,
    plan_layout,
};
