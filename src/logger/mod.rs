//! Append-only error log: one timestamped line per failure, with graceful
//! degradation to stderr when the log itself cannot be written.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Handle to the append-only error log file.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Point the log at `path`. The file is created on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `YYYY-MM-DD HH:MM:SS - message` line. Logging must never
    /// abort the run, so write failures fall back to stderr.
    pub fn append(&self, message: &str) {
        let line = format!("{} - {message}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
        if let Err(e) = self.try_append(&line) {
            eprintln!("error log unavailable ({e}): {message}");
        }
    }

    fn try_append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::ErrorLog;

    #[test]
    fn append_creates_file_with_timestamped_line() {
        let tmp = TempDir::new().unwrap();
        let log = ErrorLog::new(tmp.path().join("error.log"));
        log.append("Failed to send email: connection refused");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - Failed to send email: connection refused"));
        // Leading timestamp, e.g. "2026-08-23 07:01:02".
        assert!(lines[0].len() > "YYYY-MM-DD HH:MM:SS - ".len());
        assert_eq!(lines[0].as_bytes()[4], b'-');
    }

    #[test]
    fn appends_accumulate() {
        let tmp = TempDir::new().unwrap();
        let log = ErrorLog::new(tmp.path().join("error.log"));
        log.append("first");
        log.append("second");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn creates_missing_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let log = ErrorLog::new(tmp.path().join("logs").join("error.log"));
        log.append("nested");
        assert!(log.path().exists());
    }
}
