mod bootstrap;

use anyhow::Result;
use qlp_core::settings::Settings;
use qlp_data::reader::resolve_inputs;
use qlp_data::writer::render_report;
use qlp_runtime::orchestrator::{BatchOrchestrator, OutputOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Quake log parser v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Pipeline: {:?}, jobs: {}", settings.pipeline, settings.jobs);

    let paths = resolve_inputs(&settings.paths);
    if paths.is_empty() {
        eprintln!("No log files to process");
        std::process::exit(1);
    }

    let orchestrator = BatchOrchestrator::new(
        settings.pipeline.clone(),
        OutputOptions {
            output_dir: settings.output_dir.clone(),
            no_save: settings.no_save,
            compact: settings.compact,
        },
        settings.jobs as usize,
    );

    let outcomes = orchestrator.run(paths).await;

    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(file) => {
                if settings.print {
                    println!("{}", render_report(&file.analysis.report, settings.compact)?);
                }
                if let Some(saved) = &file.saved_to {
                    tracing::info!("Report written to {}", saved.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", outcome.path.display(), e);
            }
        }
    }

    if failures > 0 {
        tracing::warn!("{} of {} logs failed", failures, outcomes.len());
        std::process::exit(1);
    }

    Ok(())
}
