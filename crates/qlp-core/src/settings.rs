use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};

use crate::config::{ConfigFile, PipelineConfig};
use crate::error::Result;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-match statistics from Quake III Arena server logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "qlp",
    about = "Per-match statistics from Quake III Arena server logs",
    version
)]
pub struct Settings {
    /// Log files, or directories searched recursively for *.log files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory for the JSON reports (default: next to each log)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not write report files
    #[arg(long)]
    pub no_save: bool,

    /// Print each report to stdout
    #[arg(long)]
    pub print: bool,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Number of logs processed concurrently (1-64)
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=64))]
    pub jobs: u32,

    /// Config file (default: ~/.quake-log-parser/config.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Write the effective options back to the config file
    #[arg(long)]
    pub save_config: bool,

    /// Marker literals resolved from the config file.
    #[arg(skip)]
    pub pipeline: PipelineConfig,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge the config file underneath them.
    pub fn load() -> Result<Self> {
        Self::load_impl(std::env::args_os().collect(), &ConfigFile::default_path())
    }

    /// Full implementation – accepts args and an explicit default config path
    /// so that tests can redirect to a temporary directory.
    pub fn load_impl(args: Vec<std::ffi::OsString>, default_config: &Path) -> Result<Self> {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        // --save-config may name a file that does not exist yet.
        let file = match &settings.config {
            Some(path) => ConfigFile::load_from(path, !settings.save_config)?,
            None => ConfigFile::load_from(default_config, false)?,
        };

        // CLI always wins over the file.
        if settings.output_dir.is_none() {
            settings.output_dir = file.output_dir.clone();
        }
        if !is_arg_explicitly_set(&matches, "compact") {
            if let Some(v) = file.compact {
                settings.compact = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "jobs") {
            if let Some(v) = file.jobs {
                settings.jobs = v.clamp(1, 64) as u32;
            }
        }
        settings.pipeline = file.pipeline();
        settings.pipeline.validate()?;

        if settings.save_config {
            let target = settings
                .config
                .clone()
                .unwrap_or_else(|| default_config.to_path_buf());
            settings.to_config_file().save_to(&target)?;
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// The options that persist across runs.
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            match_marker: Some(self.pipeline.match_marker.clone()),
            kill_marker: Some(self.pipeline.kill_marker.clone()),
            roster_marker: Some(self.pipeline.roster_marker.clone()),
            world_id: Some(self.pipeline.world_id.clone()),
            output_dir: self.output_dir.clone(),
            compact: Some(self.compact),
            jobs: Some(self.jobs as usize),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QlpError;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<std::ffi::OsString> {
        list.iter().map(|a| (*a).into()).collect()
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["qlp", "games.log"]);

        assert_eq!(settings.paths, vec![PathBuf::from("games.log")]);
        assert!(settings.output_dir.is_none());
        assert!(!settings.no_save);
        assert!(!settings.print);
        assert!(!settings.compact);
        assert_eq!(settings.jobs, 4);
        assert!(settings.config.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.save_config);
        assert_eq!(settings.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_settings_requires_a_path() {
        assert!(Settings::try_parse_from(["qlp"]).is_err());
    }

    #[test]
    fn test_settings_jobs_out_of_range() {
        assert!(Settings::try_parse_from(["qlp", "--jobs", "0", "a.log"]).is_err());
        assert!(Settings::try_parse_from(["qlp", "--jobs", "65", "a.log"]).is_err());
    }

    #[test]
    fn test_settings_multiple_paths() {
        let settings = Settings::parse_from(["qlp", "a.log", "logs/"]);
        assert_eq!(settings.paths.len(), 2);
    }

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let default_config = ConfigFile::default_path_in(tmp.path());

        let settings =
            Settings::load_impl(args(&["qlp", "games.log"]), &default_config).expect("load");
        assert_eq!(settings.pipeline, PipelineConfig::default());
        assert_eq!(settings.jobs, 4);
    }

    #[test]
    fn test_load_merges_config_file() {
        let tmp = TempDir::new().expect("tempdir");
        let default_config = ConfigFile::default_path_in(tmp.path());
        ConfigFile {
            world_id: Some("<env>".to_string()),
            output_dir: Some(PathBuf::from("/reports")),
            compact: Some(true),
            jobs: Some(8),
            ..Default::default()
        }
        .save_to(&default_config)
        .expect("save");

        let settings =
            Settings::load_impl(args(&["qlp", "games.log"]), &default_config).expect("load");
        assert_eq!(settings.pipeline.world_id, "<env>");
        assert_eq!(settings.output_dir, Some(PathBuf::from("/reports")));
        assert!(settings.compact);
        assert_eq!(settings.jobs, 8);
    }

    #[test]
    fn test_load_cli_overrides_config_file() {
        let tmp = TempDir::new().expect("tempdir");
        let default_config = ConfigFile::default_path_in(tmp.path());
        ConfigFile {
            output_dir: Some(PathBuf::from("/reports")),
            jobs: Some(8),
            ..Default::default()
        }
        .save_to(&default_config)
        .expect("save");

        let settings = Settings::load_impl(
            args(&["qlp", "--jobs", "2", "--output-dir", "/tmp/out", "games.log"]),
            &default_config,
        )
        .expect("load");
        assert_eq!(settings.jobs, 2);
        assert_eq!(settings.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_load_explicit_missing_config_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("missing.json");
        let missing_arg = missing.to_string_lossy().to_string();

        let result = Settings::load_impl(
            args(&["qlp", "--config", missing_arg.as_str(), "games.log"]),
            &ConfigFile::default_path_in(tmp.path()),
        );
        assert!(matches!(result, Err(QlpError::Config(_))));
    }

    #[test]
    fn test_load_rejects_empty_marker_in_config() {
        let tmp = TempDir::new().expect("tempdir");
        let default_config = ConfigFile::default_path_in(tmp.path());
        ConfigFile {
            kill_marker: Some(String::new()),
            ..Default::default()
        }
        .save_to(&default_config)
        .expect("save");

        let result = Settings::load_impl(args(&["qlp", "games.log"]), &default_config);
        assert!(matches!(result, Err(QlpError::InvalidArgument(_))));
    }

    #[test]
    fn test_load_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_impl(
            args(&["qlp", "--debug", "games.log"]),
            &ConfigFile::default_path_in(tmp.path()),
        )
        .expect("load");
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_save_config_persists_effective_options() {
        let tmp = TempDir::new().expect("tempdir");
        let default_config = ConfigFile::default_path_in(tmp.path());

        Settings::load_impl(
            args(&[
                "qlp",
                "--save-config",
                "--compact",
                "--jobs",
                "3",
                "--output-dir",
                "/reports",
                "games.log",
            ]),
            &default_config,
        )
        .expect("save");
        assert!(default_config.exists());

        let settings =
            Settings::load_impl(args(&["qlp", "games.log"]), &default_config).expect("load");
        assert!(settings.compact);
        assert_eq!(settings.jobs, 3);
        assert_eq!(settings.output_dir, Some(PathBuf::from("/reports")));
        assert_eq!(settings.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_save_config_creates_named_file() {
        let tmp = TempDir::new().expect("tempdir");
        let named = tmp.path().join("qlp.json");
        let named_arg = named.to_string_lossy().to_string();

        Settings::load_impl(
            args(&["qlp", "--config", named_arg.as_str(), "--save-config", "games.log"]),
            &ConfigFile::default_path_in(tmp.path()),
        )
        .expect("save");

        let saved = ConfigFile::load_from(&named, true).expect("load");
        assert_eq!(saved.jobs, Some(4));
        assert_eq!(saved.world_id.as_deref(), Some("<world>"));
    }
}
