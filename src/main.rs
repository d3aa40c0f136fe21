use clap::{Parser, Subcommand};
use polaroid::batch::{self, BatchRequest};
use polaroid::config::{self, PolaroidConfig};
use polaroid::imaging::RustBackend;
use polaroid::style::{ColorSchemeId, PresetId};
use polaroid::{compose, load_source, output};
use std::path::{Path, PathBuf};

/// Style flags shared by `render` and `compose`.
#[derive(clap::Args, Clone)]
struct StyleArgs {
    /// Preset id or alias (see `polaroid presets`)
    #[arg(long)]
    preset: Option<PresetId>,

    /// Color scheme: light, dark (L, D)
    #[arg(long)]
    color: Option<ColorSchemeId>,
}

#[derive(Parser)]
#[command(name = "polaroid")]
#[command(about = "Render polaroid-style composites with EXIF captions")]
#[command(long_about = "\
Render polaroid-style composites with EXIF captions

Each photo gets a border in the preset's proportions and up to two caption
lines built from its EXIF data: camera make and model with the capture date,
then megapixels, dimensions, aperture, shutter speed, focal length and ISO.
The square-insta presets widen portrait photos with a blurred backdrop.

Settings are read from ./polaroid.toml (or --config) and may be overridden
by flags. Run 'polaroid gen-config' to generate a documented polaroid.toml.

Set RUST_LOG=debug to see why individual caption fields were dropped.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./polaroid.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every photo of the input directory
    Render {
        /// Input directory
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,

        /// Max parallel workers (capped at the CPU core count)
        #[arg(long)]
        max_processes: Option<usize>,

        /// Write the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Render a single photo
    Compose {
        /// Photo to render
        file: PathBuf,

        /// Output file (defaults to {stem}_{preset}_{scheme}.png next to the photo)
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// List presets and color schemes
    Presets,
    /// Print a stock polaroid.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            input,
            output: output_dir,
            style,
            max_processes,
            report,
        } => {
            let mut config = config::load_config(cli.config.as_deref())?;
            if let Some(dir) = input {
                config.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if max_processes.is_some() {
                config.processing.max_processes = max_processes;
            }
            apply_style(&mut config, &style);
            config.validate()?;

            init_thread_pool(&config.processing);
            let backend = load_backend(&config)?;
            let request = config.batch_request()?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_batch_event(&event);
                }
            });
            let result = batch::render_batch(&backend, &request, Some(tx));
            printer.join().ok();
            let batch_report = result?;

            output::print_batch_summary(&batch_report);
            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&batch_report)?;
                std::fs::write(&path, json)?;
            }
            if !batch_report.is_success() {
                std::process::exit(1);
            }
        }
        Command::Compose { file, out, style } => {
            let mut config = config::load_config(cli.config.as_deref())?;
            apply_style(&mut config, &style);
            config.validate()?;

            let backend = load_backend(&config)?;
            let request = config.batch_request()?;
            let source = load_source(&file)?;
            let canvas = compose(
                &backend,
                &source.image,
                &source.metadata,
                request.preset.preset(),
                request.color_scheme.scheme(),
            )?;

            let out = out.unwrap_or_else(|| default_output(&file, &request));
            batch::encode_png(&canvas, &out, request.compression)?;
            println!(
                "{} \u{2192} {} ({}x{})",
                file.display(),
                out.display(),
                canvas.width(),
                canvas.height()
            );
        }
        Command::Presets => {
            output::print_presets();
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// CLI style flags override the config file.
fn apply_style(config: &mut PolaroidConfig, style: &StyleArgs) {
    if let Some(preset) = style.preset {
        config.style.preset = preset.as_str().to_string();
    }
    if let Some(color) = style.color {
        config.style.color_scheme = color.as_str().to_string();
    }
}

fn load_backend(config: &PolaroidConfig) -> Result<RustBackend, Box<dyn std::error::Error>> {
    Ok(RustBackend::from_font_files(
        &config.fonts.main,
        &config.fonts.sub,
    )?)
}

fn default_output(file: &Path, request: &BatchRequest) -> PathBuf {
    let name = batch::output_name(file, request.preset, request.color_scheme);
    file.parent().unwrap_or(Path::new(".")).join(name)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
