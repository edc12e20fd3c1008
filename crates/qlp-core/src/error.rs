use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Quake log parser.
#[derive(Error, Debug)]
pub enum QlpError {
    /// A required input was missing or empty (path, marker literal, log text).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The log file does not exist.
    #[error("Log file not found: {0}")]
    FileNotFound(PathBuf),

    /// The log file exists but holds no bytes.
    #[error("Log file is empty: {0}")]
    FileEmpty(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log holds no match-start marker at all.
    #[error("No match found in log")]
    NoMatchFound,

    /// A marker was found but the segment it opens has zero length.
    #[error("Invalid segment at byte offset {offset}")]
    InvalidSegment { offset: usize },

    /// A roster or kill line is missing one of its delimiters.
    #[error("Malformed {field} at byte offset {offset}")]
    MalformedField { field: &'static str, offset: usize },

    /// A match carries neither players nor kills.
    #[error("Match {game} has no players and no kills")]
    EmptyRoster { game: usize },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the parser crates.
pub type Result<T> = std::result::Result<T, QlpError>;
