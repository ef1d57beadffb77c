//! Log record: the unit of data handed to formatters

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::panic::Location;
use std::path::Path;

/// Field names that collide with fixed record attributes or fixed output keys.
///
/// Extra fields with one of these names are dropped when the record is built.
pub const RESERVED_KEYS: &[&str] = &[
    // record attributes
    "name",
    "msg",
    "args",
    "levelname",
    "levelno",
    "pathname",
    "filename",
    "module",
    "lineno",
    "funcName",
    "created",
    "msecs",
    "relativeCreated",
    "thread",
    "threadName",
    "processName",
    "process",
    "taskName",
    "getMessage",
    "exc_info",
    "exc_text",
    "stack_info",
    "message",
    "asctime",
    // fixed JSON output keys
    "time",
    "severity",
    "logger",
    "function",
    "line",
    "exception",
];

#[inline]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Where a log call was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub module: String,
    pub function: String,
    pub line: u32,
}

impl CallSite {
    /// Build from `module_path!()`, `function_name!()` and `line!()`
    pub fn new(module_path: &str, function: &str, line: u32) -> Self {
        Self {
            module: last_path_segment(module_path).to_string(),
            function: function.to_string(),
            line,
        }
    }

    /// Call site derived from `#[track_caller]` location; the function is unknown
    pub fn from_location(location: &Location<'_>) -> Self {
        let module = Path::new(location.file())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            module,
            function: UNKNOWN_FUNCTION.to_string(),
            line: location.line(),
        }
    }

    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }
}

/// Error details captured when a record is emitted while handling an error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    pub message: String,
    /// Oldest entry first; always ends with `"<type>: <message>"`
    pub traceback: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(
        type_name: impl Into<String>,
        message: impl Into<String>,
        traceback: Vec<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            traceback,
        }
    }

    /// Capture type name, message, backtrace and source chain of `error`
    ///
    /// Backtrace frames are only present when capture is enabled through
    /// `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: Error + 'static,
    {
        let type_name = short_type_name(std::any::type_name::<E>()).to_string();
        let message = error.to_string();

        let mut traceback = capture_frames();

        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(format!("cause: {}", cause));
            source = cause.source();
        }
        traceback.extend(causes.into_iter().rev());
        traceback.push(format!("{}: {}", type_name, message));

        Self {
            type_name,
            message,
            traceback,
        }
    }
}

/// Render the current backtrace as one string per frame, outermost caller first
fn capture_frames() -> Vec<String> {
    let backtrace = Backtrace::capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }

    let rendered = backtrace.to_string();
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim_start();
        let starts_frame = trimmed
            .split_once(": ")
            .map(|(idx, _)| !idx.is_empty() && idx.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);

        match frames.last_mut() {
            Some(frame) if !starts_frame => {
                frame.push('\n');
                frame.push_str(line);
            }
            _ => frames.push(line.to_string()),
        }
    }
    frames.reverse();
    frames
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// `alloc::vec::Vec<u8>` -> `Vec`, `core::num::error::ParseIntError` -> `ParseIntError`
pub(crate) fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    last_path_segment(without_generics)
}

/// One log event before formatting
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub logger_name: String,
    pub message: String,
    pub module: String,
    pub function: String,
    pub line: u32,
    pub exception: Option<ExceptionInfo>,
    extra: LogContext,
}

impl LogRecord {
    /// Build a record, dropping any reserved keys from `extra`
    pub fn new(
        level: LogLevel,
        logger_name: impl Into<String>,
        message: impl Into<String>,
        call_site: CallSite,
        extra: &LogContext,
    ) -> Self {
        let mut extra = extra.clone();
        extra.retain(|key, _| !is_reserved_key(key));

        Self {
            timestamp: Utc::now(),
            level,
            logger_name: logger_name.into(),
            message: message.into(),
            module: call_site.module,
            function: call_site.function,
            line: call_site.line,
            exception: None,
            extra,
        }
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Extra fields; never contains a reserved key
    pub fn extra(&self) -> &LogContext {
        &self.extra
    }
}
