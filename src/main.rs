//! checkerforge - checkerboard pattern generator
//!
//! Renders two-color checkerboards from presets, explicit sizes or RON
//! config files, and writes them as PNG/BMP/JPEG or shows a live preview.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use checkerforge::batch::{load_batch, run_batch, BatchOptions};
use checkerforge::config::{load_config, save_config, CanvasSize, RenderConfig, SQUARE_SIZE_RANGE};
use checkerforge::export::{write_image, write_temp_png};
use checkerforge::presets::PRESETS;
use checkerforge::viewer;
use checkerforge::Paint;

#[derive(Parser)]
#[command(name = "checkerforge")]
#[command(about = "Checkerboard pattern generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one checkerboard to an image file
    Render {
        #[command(flatten)]
        params: RenderArgs,

        /// Output file (.png, .bmp, .jpg). Defaults to a new temporary PNG
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open a preview window
    View {
        #[command(flatten)]
        params: RenderArgs,
    },

    /// List canvas size presets
    Presets,

    /// List named colors
    Colors,

    /// Write the default render config as RON
    InitConfig {
        #[arg(default_value = "checkerboard.ron")]
        path: PathBuf,
    },

    /// Render every job in a RON batch file
    Batch {
        /// Batch file
        file: PathBuf,

        /// Directory relative job outputs are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Render one job at a time
        #[arg(long)]
        serial: bool,

        /// Allow square sizes outside the usual range
        #[arg(long)]
        unbounded: bool,
    },
}

/// Render parameters shared by `render` and `view`; flags override the config file
#[derive(Args, Debug, Clone)]
struct RenderArgs {
    /// RON config file to start from
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas size preset (see `presets`)
    #[arg(short, long, conflicts_with_all = ["width", "height"])]
    preset: Option<String>,

    /// Canvas width in pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Edge length of each square in pixels
    #[arg(short, long)]
    square_size: Option<u32>,

    /// Color of the top-left square: name, #rgb, #rrggbb, #rrggbbaa or Transparent
    #[arg(short = 'a', long)]
    color_a: Option<Paint>,

    /// Second color
    #[arg(short = 'b', long)]
    color_b: Option<Paint>,

    /// Allow square sizes outside the usual range
    #[arg(long)]
    unbounded: bool,
}

impl RenderArgs {
    fn build_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(preset) = &self.preset {
            config.canvas = CanvasSize::Preset(preset.clone());
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            config.canvas = CanvasSize::Custom { width, height };
        }
        if let Some(size) = self.square_size {
            config.square_size = size;
        }
        if let Some(color) = self.color_a {
            config.color_a = color;
        }
        if let Some(color) = self.color_b {
            config.color_b = color;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { params, output } => render_command(&params, output),
        Commands::View { params } => {
            let config = params.build_config()?;
            viewer::run(config, params.unbounded).context("Preview failed")
        }
        Commands::Presets => {
            for preset in &PRESETS {
                println!("{:<14} {:>5} x {:<5} {}", preset.slug, preset.width, preset.height, preset.label);
            }
            Ok(())
        }
        Commands::Colors => {
            for (name, paint) in &Paint::NAMED {
                let rgba = paint.resolve();
                println!("{:<12} #{:02x}{:02x}{:02x}{:02x}", name, rgba.r, rgba.g, rgba.b, rgba.a);
            }
            Ok(())
        }
        Commands::InitConfig { path } => {
            save_config(&RenderConfig::default(), &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Batch { file, out_dir, serial, unbounded } => {
            let batch = load_batch(&file)
                .with_context(|| format!("Failed to load batch {}", file.display()))?;
            let options = BatchOptions {
                out_dir,
                serial,
                unbounded,
                show_progress: true,
            };
            let report = run_batch(&batch, &options);
            for (output, error) in &report.failed {
                eprintln!("{}: {}", output.display(), error);
            }
            if !report.is_success() {
                bail!("{} of {} jobs failed", report.failed.len(), batch.jobs.len());
            }
            Ok(())
        }
    }
}

fn render_command(params: &RenderArgs, output: Option<PathBuf>) -> Result<()> {
    let config = params.build_config()?;
    let request = if params.unbounded {
        config.resolve_unbounded()?
    } else {
        config.resolve().with_context(|| {
            format!(
                "Invalid parameters (square size must be {}..={}, or pass --unbounded)",
                SQUARE_SIZE_RANGE.start(),
                SQUARE_SIZE_RANGE.end()
            )
        })?
    };

    let canvas = request.render().context("Render failed")?;
    let path = match output {
        Some(path) => {
            write_image(&canvas, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => write_temp_png(&canvas).context("Failed to write temporary PNG")?,
    };

    println!("{}", path.display());
    Ok(())
}
