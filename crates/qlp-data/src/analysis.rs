//! Main pipeline: segment the log, classify every kill, aggregate each match
//! and assemble the [`Report`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use qlp_core::config::PipelineConfig;
use qlp_core::error::{QlpError, Result};
use qlp_core::models::{MatchReport, Report};
use tracing::debug;

use crate::aggregator::MatchAggregator;
use crate::classifier::classify_kill;
use crate::reader::load_log;
use crate::roster::extract_roster;
use crate::segmenter::{split_kills, split_matches, Segment};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// The log file the report was built from.
    pub source: PathBuf,
    /// Bytes read from the log.
    pub bytes_read: usize,
    /// Number of matches in the report.
    pub matches: usize,
    /// Kills across all matches.
    pub total_kills: u64,
    /// Wall-clock seconds spent reading the log.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent in the pipeline.
    pub evaluate_time_seconds: f64,
}

/// The complete output of [`analyze_log`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub report: Report,
    pub metadata: AnalysisMetadata,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the pipeline over an in-memory log.
///
/// Fails on the first structural error; no partial report is returned.
pub fn evaluate(text: &[u8], config: &PipelineConfig) -> Result<Report> {
    if text.is_empty() {
        return Err(QlpError::InvalidArgument("log text is empty".to_string()));
    }
    config.validate()?;

    let games = split_matches(text, config.match_marker.as_bytes())?;
    debug!("Found {} match segments", games.len());

    let matches = games
        .iter()
        .enumerate()
        .map(|(index, game)| evaluate_match(index + 1, game, config))
        .collect::<Result<Vec<_>>>()?;

    assemble_report(matches)
}

/// Collect per-match reports, in segment order, into the final [`Report`].
pub fn assemble_report(matches: Vec<MatchReport>) -> Result<Report> {
    if matches.is_empty() {
        return Err(QlpError::NoMatchFound);
    }
    Ok(Report { matches })
}

/// Load `path` and run the pipeline over it.
pub fn analyze_log(path: &Path, config: &PipelineConfig) -> Result<AnalysisResult> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = Instant::now();
    let text = load_log(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Evaluate ──────────────────────────────────────────────────────
    let evaluate_start = Instant::now();
    let report = evaluate(&text, config)?;
    let evaluate_time = evaluate_start.elapsed().as_secs_f64();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source: path.to_path_buf(),
        bytes_read: text.len(),
        matches: report.matches.len(),
        total_kills: report.total_kills(),
        load_time_seconds: load_time,
        evaluate_time_seconds: evaluate_time,
    };

    Ok(AnalysisResult { report, metadata })
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn evaluate_match(game: usize, segment: &Segment<'_>, config: &PipelineConfig) -> Result<MatchReport> {
    let kill_marker = config.kill_marker.as_bytes();
    let world_id = config.world_id.as_bytes();

    let roster = extract_roster(segment, config.roster_marker.as_bytes(), world_id)?;
    let kills = split_kills(segment, kill_marker)?;

    let mut aggregator = MatchAggregator::new(game, roster);
    for kill in &kills {
        // Kill offsets are relative to the match; lift them to log offsets.
        let kill = Segment {
            offset: segment.offset + kill.offset,
            bytes: kill.bytes,
        };
        aggregator.add_kill(&classify_kill(&kill, kill_marker, world_id)?);
    }
    aggregator.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
