//! File handler implementation

use crate::core::{Formatter, Handler, LogLevel, LogRecord, LoggerError, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    #[default]
    Append,
    Truncate,
}

pub struct FileHandler {
    name: String,
    path: PathBuf,
    level: LogLevel,
    formatter: Box<dyn Formatter>,
    writer: Mutex<BufWriter<File>>,
}

impl FileHandler {
    /// Open `path` for logging; the parent directory must already exist
    pub fn new<F: Formatter + 'static>(
        path: impl Into<PathBuf>,
        mode: FileMode,
        formatter: F,
    ) -> Result<Self> {
        Self::from_boxed(path, mode, Box::new(formatter))
    }

    pub(crate) fn from_boxed(
        path: impl Into<PathBuf>,
        mode: FileMode,
        formatter: Box<dyn Formatter>,
    ) -> Result<Self> {
        let path = path.into();
        let mut options = OpenOptions::new();
        match mode {
            FileMode::Append => options.create(true).append(true),
            FileMode::Truncate => options.create(true).write(true).truncate(true),
        };
        let file = options.open(&path).map_err(|e| {
            LoggerError::io_operation("opening log file", path.display().to_string(), e)
        })?;

        Ok(Self {
            name: path.display().to_string(),
            path,
            level: LogLevel::Debug,
            formatter,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Handler for FileHandler {
    fn handle(&self, record: &LogRecord) -> Result<()> {
        let mut line = self.formatter.format(record)?;
        line.push('\n');

        let mut writer = self.writer.lock();
        // flushed per record so readers tailing the file see complete lines
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::handler(
                    self.name.as_str(),
                    format!("write to {} failed: {}", self.path.display(), e),
                )
            })
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> LogLevel {
        self.level
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogContext};
    use crate::formatters::JsonFormatter;
    use std::fs;
    use tempfile::tempdir;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(
            LogLevel::Info,
            "svc",
            message,
            CallSite::new("app", "main", 1),
            &LogContext::new().with_field("iteration", 1),
        )
    }

    #[test]
    fn test_file_handler_appends_jsonl() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.json");

        let handler = FileHandler::new(&log_path, FileMode::Append, JsonFormatter::new())?;
        for i in 0..3 {
            handler.handle(&record(&format!("Iteration {}", i)))?;
        }

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
            assert_eq!(parsed["iteration"], 1);
        }
        Ok(())
    }

    #[test]
    fn test_truncate_mode_discards_previous_content() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.json");
        fs::write(&log_path, "old line\n")?;

        let handler = FileHandler::new(&log_path, FileMode::Truncate, JsonFormatter::new())?;
        handler.handle(&record("fresh"))?;

        let content = fs::read_to_string(&log_path)?;
        assert!(!content.contains("old line"));
        assert_eq!(content.lines().count(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let result = FileHandler::new(
            dir.path().join("missing").join("app.json"),
            FileMode::Append,
            JsonFormatter::new(),
        );
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
    }
}
