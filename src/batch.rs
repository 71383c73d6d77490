//! Batch rendering
//!
//! Renders a list of jobs from a RON batch file. Each job is independent,
//! so jobs run in parallel on the rayon pool unless serial mode is asked for.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{pretty_config, ConfigError, RenderConfig};
use crate::export::{write_image, ExportError};
use crate::rasterizer::RenderError;

/// One output image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    /// Output path, relative to the batch output directory unless absolute
    pub output: PathBuf,
    #[serde(default)]
    pub config: RenderConfig,
}

/// Contents of a batch file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFile {
    pub jobs: Vec<BatchJob>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    /// Render one job at a time on the calling thread
    pub serial: bool,
    /// Skip the square size range check
    pub unbounded: bool,
    pub show_progress: bool,
}

/// Why a single job failed
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Outcome of a batch run, in job order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load a batch file from RON
pub fn load_batch<P: AsRef<Path>>(path: P) -> Result<BatchFile, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_batch_from_str(&contents)
}

pub fn load_batch_from_str(s: &str) -> Result<BatchFile, ConfigError> {
    Ok(ron::from_str(s)?)
}

pub fn save_batch<P: AsRef<Path>>(batch: &BatchFile, path: P) -> Result<(), ConfigError> {
    let contents = ron::ser::to_string_pretty(batch, pretty_config())?;
    fs::write(path, contents)?;
    Ok(())
}

fn run_job(job: &BatchJob, options: &BatchOptions) -> Result<PathBuf, BatchError> {
    let request = if options.unbounded {
        job.config.resolve_unbounded()?
    } else {
        job.config.resolve()?
    };
    let canvas = request.render()?;

    let path = options.out_dir.join(&job.output);
    write_image(&canvas, &path)?;
    Ok(path)
}

/// Render every job. A failing job is recorded and the rest keep going.
pub fn run_batch(batch: &BatchFile, options: &BatchOptions) -> BatchReport {
    let progress = if options.show_progress {
        ProgressBar::new(batch.jobs.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        progress.set_style(style.progress_chars("=>-"));
    }
    progress.set_message("Rendering...");

    let run = |job: &BatchJob| {
        let result = run_job(job, options);
        progress.inc(1);
        (job.output.clone(), result)
    };

    let results: Vec<_> = if options.serial {
        batch.jobs.iter().map(run).collect()
    } else {
        batch.jobs.par_iter().map(run).collect()
    };

    let mut report = BatchReport::default();
    for (output, result) in results {
        match result {
            Ok(path) => report.written.push(path),
            Err(e) => {
                warn!("Job {} failed: {}", output.display(), e);
                report.failed.push((output, e.to_string()));
            }
        }
    }

    progress.finish_with_message("Done");
    info!(
        "Batch finished: {} written, {} failed",
        report.written.len(),
        report.failed.len()
    );
    report
}
