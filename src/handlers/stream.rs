//! Stream handler: stdout, stderr or any `Write`

use crate::core::{Formatter, Handler, LogLevel, LogRecord, LoggerError, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use std::io::{IsTerminal, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamTarget {
    #[default]
    Stdout,
    Stderr,
}

impl StreamTarget {
    /// Whether the stream is attached to a terminal
    pub fn is_terminal(&self) -> bool {
        match self {
            StreamTarget::Stdout => std::io::stdout().is_terminal(),
            StreamTarget::Stderr => std::io::stderr().is_terminal(),
        }
    }

    fn writer(&self) -> Box<dyn Write + Send> {
        match self {
            StreamTarget::Stdout => Box::new(std::io::stdout()),
            StreamTarget::Stderr => Box::new(std::io::stderr()),
        }
    }
}

pub struct StreamHandler {
    name: String,
    level: LogLevel,
    formatter: Box<dyn Formatter>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StreamHandler {
    pub fn new<F: Formatter + 'static>(target: StreamTarget, formatter: F) -> Self {
        Self::from_boxed(target, Box::new(formatter))
    }

    pub(crate) fn from_boxed(target: StreamTarget, formatter: Box<dyn Formatter>) -> Self {
        let name = match target {
            StreamTarget::Stdout => "stdout",
            StreamTarget::Stderr => "stderr",
        };
        Self::build(name, target.writer(), formatter)
    }

    /// Write to an arbitrary destination, e.g. an in-memory buffer
    pub fn with_writer<F: Formatter + 'static>(
        name: impl Into<String>,
        writer: Box<dyn Write + Send>,
        formatter: F,
    ) -> Self {
        Self::build(name, writer, Box::new(formatter))
    }

    fn build(
        name: impl Into<String>,
        writer: Box<dyn Write + Send>,
        formatter: Box<dyn Formatter>,
    ) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Debug,
            formatter,
            writer: Mutex::new(writer),
        }
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
}

impl Handler for StreamHandler {
    fn handle(&self, record: &LogRecord) -> Result<()> {
        let mut line = self.formatter.format(record)?;
        line.push('\n');

        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| LoggerError::handler(self.name.as_str(), format!("write failed: {}", e)))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogContext};
    use crate::formatters::{ConsoleFormatter, JsonFormatter};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn record(message: &str) -> LogRecord {
        LogRecord::new(
            LogLevel::Info,
            "svc",
            message,
            CallSite::new("app", "main", 1),
            &LogContext::new(),
        )
    }

    #[test]
    fn test_writes_one_line_per_record() -> Result<()> {
        let buffer = SharedBuffer::default();
        let handler = StreamHandler::with_writer(
            "buffer",
            Box::new(buffer.clone()),
            ConsoleFormatter::with_format("{severity} {message}")?,
        );

        handler.handle(&record("first"))?;
        handler.handle(&record("second"))?;

        assert_eq!(buffer.contents(), "    INFO first\n    INFO second\n");
        Ok(())
    }

    #[test]
    fn test_json_stream() -> Result<()> {
        let buffer = SharedBuffer::default();
        let handler = StreamHandler::with_writer("buffer", Box::new(buffer.clone()), JsonFormatter::new())
            .with_level(LogLevel::Warning);

        handler.handle(&record("as json"))?;
        let parsed: serde_json::Value = serde_json::from_str(buffer.contents().trim_end())?;
        assert_eq!(parsed["message"], "as json");
        assert_eq!(handler.level(), LogLevel::Warning);
        Ok(())
    }

    #[test]
    fn test_default_names() {
        let handler = StreamHandler::new(StreamTarget::Stderr, JsonFormatter::new());
        assert_eq!(handler.name(), "stderr");
        assert_eq!(handler.with_name("console").name(), "console");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "reader closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_handler_error() {
        let handler = StreamHandler::with_writer("pipe", Box::new(BrokenPipe), JsonFormatter::new());

        match handler.handle(&record("lost")) {
            Err(LoggerError::HandlerError { handler, message }) => {
                assert_eq!(handler, "pipe");
                assert!(message.contains("reader closed"));
            }
            other => panic!("expected HandlerError, got {:?}", other),
        }
    }
}
