//! Log file discovery and loading.

use std::path::{Path, PathBuf};

use qlp_core::error::{QlpError, Result};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Read a whole log file into memory.
///
/// Fails with `InvalidArgument` for an empty path, `FileNotFound` when the
/// file is absent, `FileEmpty` when it holds no bytes and `FileRead` for any
/// other I/O failure.
pub fn load_log(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(QlpError::InvalidArgument("log path is empty".to_string()));
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => QlpError::FileNotFound(path.to_path_buf()),
        _ => QlpError::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if bytes.is_empty() {
        return Err(QlpError::FileEmpty(path.to_path_buf()));
    }

    debug!("Loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Find all `.log` files recursively under `dir`, sorted by path.
pub fn find_log_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Log directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "log")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand command-line inputs: files are kept as given, directories are
/// replaced by the `.log` files beneath them. Input order is preserved.
pub fn resolve_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut resolved = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_log_files(input);
            if found.is_empty() {
                warn!("No .log files found in {}", input.display());
            }
            resolved.extend(found);
        } else {
            resolved.push(input.clone());
        }
    }
    resolved
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── load_log ──────────────────────────────────────────────────────────────

    #[test]
    fn test_load_log_reads_bytes() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "games.log", "  0:00 InitGame: x\n");
        assert_eq!(load_log(&path).unwrap(), b"  0:00 InitGame: x\n".to_vec());
    }

    #[test]
    fn test_load_log_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.log");
        assert!(matches!(load_log(&path), Err(QlpError::FileNotFound(p)) if p == path));
    }

    #[test]
    fn test_load_log_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "empty.log", "");
        assert!(matches!(load_log(&path), Err(QlpError::FileEmpty(_))));
    }

    #[test]
    fn test_load_log_empty_path() {
        assert!(matches!(
            load_log(Path::new("")),
            Err(QlpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_load_log_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_log(dir.path()),
            Err(QlpError::FileRead { .. })
        ));
    }

    // ── find_log_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_log_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("server-2");
        std::fs::create_dir_all(&sub).unwrap();
        write_file(dir.path(), "b.log", "x");
        write_file(dir.path(), "a.log", "x");
        write_file(dir.path(), "notes.txt", "x");
        write_file(&sub, "c.log", "x");

        let files = find_log_files(dir.path());
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.extension().unwrap() == "log"));
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_find_log_files_nonexistent_path() {
        let files = find_log_files(Path::new("/tmp/does-not-exist-qlp-test-xyz"));
        assert!(files.is_empty());
    }

    // ── resolve_inputs ────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_inputs_expands_directories() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir_all(&logs).unwrap();
        write_file(&logs, "one.log", "x");
        write_file(&logs, "two.log", "x");
        let single = write_file(dir.path(), "games.log", "x");

        let resolved = resolve_inputs(&[single.clone(), logs.clone()]);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0], single);
        assert!(resolved[1..].iter().all(|p| p.starts_with(&logs)));
    }

    #[test]
    fn test_resolve_inputs_keeps_missing_files() {
        let missing = PathBuf::from("/tmp/qlp-missing-input.log");
        assert_eq!(resolve_inputs(&[missing.clone()]), vec![missing]);
    }
}
