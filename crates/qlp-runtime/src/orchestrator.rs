//! Batch orchestrator.
//!
//! Runs one independent pipeline per log file on tokio's blocking pool. The
//! pipelines share nothing but the immutable configuration; each one loads,
//! evaluates and saves its own report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use qlp_core::config::PipelineConfig;
use qlp_core::error::{QlpError, Result};
use qlp_data::analysis::{analyze_log, AnalysisResult};
use qlp_data::writer::save_report;
use tokio::sync::Semaphore;
use tracing::{debug, info};

// ── Public types ──────────────────────────────────────────────────────────────

/// Where and how reports are written.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Directory for the reports; `None` writes next to each log.
    pub output_dir: Option<PathBuf>,
    /// Skip writing report files entirely.
    pub no_save: bool,
    /// Single-line JSON.
    pub compact: bool,
}

/// A successfully processed log.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub analysis: AnalysisResult,
    /// The report file written, unless saving was disabled.
    pub saved_to: Option<PathBuf>,
}

/// The outcome for one input path.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileReport>,
}

// ── BatchOrchestrator ─────────────────────────────────────────────────────────

/// Processes a list of logs with at most `jobs` pipelines in flight.
pub struct BatchOrchestrator {
    config: Arc<PipelineConfig>,
    output: Arc<OutputOptions>,
    jobs: usize,
}

impl BatchOrchestrator {
    /// Create a new orchestrator. `jobs` is clamped to at least 1.
    pub fn new(config: PipelineConfig, output: OutputOptions, jobs: usize) -> Self {
        Self {
            config: Arc::new(config),
            output: Arc::new(output),
            jobs: jobs.max(1),
        }
    }

    /// Process every path and return the outcomes in input order.
    pub async fn run(&self, paths: Vec<PathBuf>) -> Vec<FileOutcome> {
        let permits = Arc::new(Semaphore::new(self.jobs));
        let mut handles = Vec::with_capacity(paths.len());

        for path in paths {
            let permits = Arc::clone(&permits);
            let config = Arc::clone(&self.config);
            let output = Arc::clone(&self.output);
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                // The semaphore is never closed, so acquiring cannot fail.
                let _permit = permits.acquire_owned().await.ok();
                tokio::task::spawn_blocking(move || process_file(&task_path, &config, &output))
                    .await
            });
            handles.push((path, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let result = match handle.await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) | Err(e) => Err(QlpError::Other(anyhow_from_join(e))),
            };
            match &result {
                Ok(file) => info!(
                    "{}: {} matches, {} kills",
                    path.display(),
                    file.analysis.metadata.matches,
                    file.analysis.metadata.total_kills
                ),
                Err(e) => debug!("{}: failed: {}", path.display(), e),
            }
            outcomes.push(FileOutcome { path, result });
        }
        outcomes
    }
}

/// Load, evaluate and save one log. Runs on the blocking pool.
pub fn process_file(
    path: &Path,
    config: &PipelineConfig,
    output: &OutputOptions,
) -> Result<FileReport> {
    let analysis = analyze_log(path, config)?;
    debug!(
        "{}: evaluated {} bytes in {:.3}s",
        path.display(),
        analysis.metadata.bytes_read,
        analysis.metadata.evaluate_time_seconds
    );

    let saved_to = if output.no_save {
        None
    } else {
        Some(save_report(
            &analysis.report,
            path,
            output.output_dir.as_deref(),
            output.compact,
        )?)
    };

    Ok(FileReport { analysis, saved_to })
}

fn anyhow_from_join(e: tokio::task::JoinError) -> anyhow::Error {
    anyhow::anyhow!("pipeline task failed: {e}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
