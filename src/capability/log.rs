//! Audit log sinks for completed turns

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, trace, warn, Level};

use super::TurnLog;

/// Forwards turn records to the process-wide `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingLog;

impl TracingLog {
    pub fn new() -> Self {
        Self
    }
}

impl TurnLog for TracingLog {
    fn log(&mut self, message: &str, level: Level) -> bool {
        match level {
            Level::ERROR => error!(target: "emma::turns", "{}", message),
            Level::WARN => warn!(target: "emma::turns", "{}", message),
            Level::INFO => info!(target: "emma::turns", "{}", message),
            Level::DEBUG => debug!(target: "emma::turns", "{}", message),
            Level::TRACE => trace!(target: "emma::turns", "{}", message),
        }
        true
    }
}

/// Appends timestamped turn records to a file
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    file: File,
}

impl FileLog {
    /// Open (or create) the log file in append mode
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_owned(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TurnLog for FileLog {
    fn log(&mut self, message: &str, level: Level) -> bool {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let record = format!("[{}] {}:{}\n", stamp, level, message);

        match self
            .file
            .write_all(record.as_bytes())
            .and_then(|_| self.file.flush())
        {
            Ok(()) => true,
            Err(e) => {
                warn!(?e, path = ?self.path, "failed to write turn record");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_log_always_succeeds() {
        let mut log = TracingLog::new();
        assert!(log.log("\nInput: hi\nOutput: hello", Level::DEBUG));
    }

    #[test]
    fn test_file_log_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.log");

        let mut log = FileLog::open(&path).unwrap();
        assert!(log.log("\nInput: one\nOutput: 1", Level::DEBUG));
        assert!(log.log("\nInput: two\nOutput: 2", Level::INFO));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("DEBUG:\nInput: one\nOutput: 1"));
        assert!(contents.contains("INFO:\nInput: two\nOutput: 2"));
        assert_eq!(log.path(), path.as_path());
    }

    #[test]
    fn test_file_log_open_fails_for_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("turns.log");
        assert!(FileLog::open(&path).is_err());
    }
}
