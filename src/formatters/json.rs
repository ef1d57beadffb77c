//! JSON formatter for structured logging
//!
//! Each record becomes a single-line JSON object (JSONL), parseable one line
//! at a time by log aggregation tools like ELK, Loki, etc.

use crate::core::{Formatter, LogRecord, LoggerError, Result, TimestampFormat};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Renders records as
/// `{"time", "severity", "logger", "message", "module", "function", "line", ["exception"], ...extra}`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Multi-line output for debugging; not valid JSONL
    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    /// The record as a JSON value, with the same keys and order as `format`
    pub fn to_value(&self, record: &LogRecord) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(JsonLine(record))?)
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut buf = Vec::with_capacity(256 + record.message.len());
        if self.pretty {
            serde_json::to_writer_pretty(&mut buf, &JsonLine(record))?;
        } else {
            serde_json::to_writer(&mut buf, &JsonLine(record))?;
        }
        String::from_utf8(buf).map_err(|e| LoggerError::formatter("json", e.to_string()))
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Serializes straight from the record without building an intermediate map
struct JsonLine<'a>(&'a LogRecord);

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let record = self.0;
        let extra = record.extra();
        let fixed = 7 + usize::from(record.exception.is_some());

        let mut map = serializer.serialize_map(Some(fixed + extra.len()))?;
        map.serialize_entry("time", &TimestampFormat::Rfc3339.format(&record.timestamp))?;
        map.serialize_entry("severity", record.level.to_str())?;
        map.serialize_entry("logger", &record.logger_name)?;
        map.serialize_entry("message", &record.message)?;
        map.serialize_entry("module", &record.module)?;
        map.serialize_entry("function", &record.function)?;
        map.serialize_entry("line", &record.line)?;

        if let Some(exception) = &record.exception {
            map.serialize_entry("exception", exception)?;
        }

        for (key, value) in extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
