//! JSON rendering and persistence of a [`Report`].

use std::path::{Path, PathBuf};

use qlp_core::error::{QlpError, Result};
use qlp_core::models::Report;
use tracing::debug;

/// Render `report` as JSON text, pretty-printed unless `compact`.
pub fn render_report(report: &Report, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    Ok(json)
}

/// Where the report for `log_path` goes: `<log file name>.json`, next to the
/// log or inside `output_dir` when given.
pub fn report_path(log_path: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let file_name = log_path.file_name().ok_or_else(|| {
        QlpError::InvalidArgument(format!("{} has no file name", log_path.display()))
    })?;
    let mut name = file_name.to_os_string();
    name.push(".json");

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => log_path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(name))
}

/// Atomically write the report for `log_path` and return the file written.
///
/// Overwrites an existing report; creates `output_dir` if needed.
pub fn save_report(
    report: &Report,
    log_path: &Path,
    output_dir: Option<&Path>,
    compact: bool,
) -> Result<PathBuf> {
    let path = report_path(log_path, output_dir)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = render_report(report, compact)?;

    // Write to a temp file then rename for atomicity.
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json)?;
    std::fs::rename(&tmp, &path)?;

    debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(path)
}
