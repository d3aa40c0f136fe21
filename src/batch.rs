//! Batch rendering of a directory of photos.
//!
//! Every supported image directly inside the input directory is composed
//! with one preset and color scheme and written as PNG to the output
//! directory:
//!
//! ```text
//! input/                          output/
//! ├── beach.jpg          ──►      ├── beach_square-insta-compact_light.png
//! ├── IMG_0042.JPG       ──►      ├── IMG_0042_square-insta-compact_light.png
//! └── notes.txt   (skipped)       └── ...
//! ```
//!
//! ## Parallel Processing
//!
//! Files are rendered in parallel with [rayon](https://docs.rs/rayon) on the
//! global pool (sized by [`crate::config::effective_threads`]). Each file
//! yields its own result; a file that fails to decode or render is reported
//! and the rest of the batch carries on.
//!
//! Progress is streamed through an optional [`Sender`] so the CLI can print
//! as items finish, while the returned [`BatchReport`] keeps input order.

use crate::compose::{ComposeError, SourceImage, compose, decode_source};
use crate::imaging::{ImageBackend, supported_input_extensions};
use crate::style::{ColorSchemeId, PresetId};
use image::RgbImage;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// PNG compression effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Fast,
    Default,
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub preset: PresetId,
    pub color_scheme: ColorSchemeId,
    pub compression: PngCompression,
}

/// Progress events, sent as items finish (not in input order).
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    Rendered {
        /// 1-based position in the sorted input listing.
        index: usize,
        source: PathBuf,
        output: PathBuf,
        width: u32,
        height: u32,
    },
    Failed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedItem {
    pub source: PathBuf,
    pub output: PathBuf,
    pub preset: PresetId,
    pub color_scheme: ColorSchemeId,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedItem {
    pub source: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub rendered: Vec<RenderedItem>,
    pub failed: Vec<FailedItem>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Supported images directly inside `dir`, sorted by file name.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input directory not found: {}", dir.display()),
        )));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_supported(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| supported_input_extensions().contains(&ext.as_str()))
}

/// `{stem}_{preset}_{scheme}.png`
pub fn output_name(source: &Path, preset: PresetId, scheme: ColorSchemeId) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}_{preset}_{scheme}.png")
}

/// Write `canvas` as an 8-bit RGB PNG.
pub fn encode_png(
    canvas: &RgbImage,
    path: &Path,
    compression: PngCompression,
) -> Result<(), BatchError> {
    let writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new_with_quality(writer, compression.into(), FilterType::Adaptive);
    canvas.write_with_encoder(encoder)?;
    Ok(())
}

/// Decode, compose and write one file.
pub fn render_one(
    backend: &impl ImageBackend,
    source: &Path,
    request: &BatchRequest,
) -> Result<RenderedItem, BatchError> {
    let bytes = std::fs::read(source)?;
    let SourceImage { image, metadata } = decode_source(&bytes)?;
    let canvas = compose(
        backend,
        &image,
        &metadata,
        request.preset.preset(),
        request.color_scheme.scheme(),
    )?;

    let output = request
        .output_dir
        .join(output_name(source, request.preset, request.color_scheme));
    encode_png(&canvas, &output, request.compression)?;

    Ok(RenderedItem {
        source: source.to_path_buf(),
        output,
        preset: request.preset,
        color_scheme: request.color_scheme,
        width: canvas.width(),
        height: canvas.height(),
    })
}

/// Render every supported image of `request.input_dir`.
///
/// Only listing the input and creating the output directory can fail the
/// whole batch; per-file errors end up in [`BatchReport::failed`].
pub fn render_batch(
    backend: &impl ImageBackend,
    request: &BatchRequest,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchReport, BatchError> {
    let sources = list_sources(&request.input_dir)?;
    std::fs::create_dir_all(&request.output_dir)?;

    log::info!(
        "rendering {} file(s) from {} with {}/{}",
        sources.len(),
        request.input_dir.display(),
        request.preset,
        request.color_scheme
    );
    let send = |event: BatchEvent| {
        if let Some(tx) = &events {
            // A closed receiver only means nobody is listening.
            tx.send(event).ok();
        }
    };
    send(BatchEvent::Started {
        total: sources.len(),
    });

    let results: Vec<_> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let result = render_one(backend, source, request);
            match &result {
                Ok(item) => send(BatchEvent::Rendered {
                    index: i + 1,
                    source: item.source.clone(),
                    output: item.output.clone(),
                    width: item.width,
                    height: item.height,
                }),
                Err(e) => {
                    log::warn!("{}: {e}", source.display());
                    send(BatchEvent::Failed {
                        index: i + 1,
                        source: source.clone(),
                        error: e.to_string(),
                    });
                }
            }
            (source, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (source, result) in results {
        match result {
            Ok(item) => report.rendered.push(item),
            Err(e) => report.failed.push(FailedItem {
                source: source.clone(),
                error: e.to_string(),
            }),
        }
    }
    Ok(report)
}
