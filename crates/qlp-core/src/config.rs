//! Pipeline configuration and the optional on-disk config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QlpError, Result};

/// Token that opens a new match.
pub const MATCH_MARKER: &str = "InitGame:";
/// Token that opens a kill event line.
pub const KILL_MARKER: &str = "Kill:";
/// Token that opens a player info line.
pub const ROSTER_MARKER: &str = "ClientUserinfoChanged:";
/// Reserved identifier for environmental deaths.
pub const WORLD_ID: &str = "<world>";

// ── PipelineConfig ────────────────────────────────────────────────────────────

/// Marker literals the pipeline scans for, built by the caller and passed by
/// reference into every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub match_marker: String,
    pub kill_marker: String,
    pub roster_marker: String,
    pub world_id: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_marker: MATCH_MARKER.to_string(),
            kill_marker: KILL_MARKER.to_string(),
            roster_marker: ROSTER_MARKER.to_string(),
            world_id: WORLD_ID.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Reject empty literals: an empty marker would match at every offset.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("match_marker", &self.match_marker),
            ("kill_marker", &self.kill_marker),
            ("roster_marker", &self.roster_marker),
            ("world_id", &self.world_id),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(QlpError::InvalidArgument(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

// ── ConfigFile ────────────────────────────────────────────────────────────────

/// Persisted options read from `~/.quake-log-parser/config.json` or `--config`.
///
/// Every field is optional; absent fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl ConfigFile {
    /// Default location: `~/.quake-log-parser/config.json`.
    pub fn default_path() -> PathBuf {
        Self::default_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn default_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".quake-log-parser").join("config.json")
    }

    /// Load the file at `path`.
    ///
    /// A missing file is an error only when `required` is set (the user named
    /// it explicitly); otherwise defaults are returned.
    pub fn load_from(path: &Path, required: bool) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!("No config file at {}; using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(QlpError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        let file = serde_json::from_str(&content)
            .map_err(|e| QlpError::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        debug!("Loaded config file {}", path.display());
        Ok(file)
    }

    /// Write the file to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;
        debug!("Saved config file {}", path.display());
        Ok(())
    }

    /// Apply marker overrides on top of the built-in pipeline defaults.
    pub fn pipeline(&self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            match_marker: self.match_marker.clone().unwrap_or(defaults.match_marker),
            kill_marker: self.kill_marker.clone().unwrap_or(defaults.kill_marker),
            roster_marker: self.roster_marker.clone().unwrap_or(defaults.roster_marker),
            world_id: self.world_id.clone().unwrap_or(defaults.world_id),
        }
    }
}
