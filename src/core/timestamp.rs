//! Timestamp formatting utilities
//!
//! Provides the timestamp renderings used by the formatters: RFC 3339 with a
//! UTC offset for JSON output, a compact local-style layout for console
//! output, and custom strftime formats from configuration.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_structured_logging::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Rfc3339;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with("+00:00"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45.123`
    ///
    /// Default for console output.
    #[default]
    Console,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 with microseconds and explicit offset: `2025-01-08T10:30:45.123456+00:00`
    ///
    /// Used for the `time` key of JSON output.
    Rfc3339,

    /// Custom strftime format, validated by [`TimestampFormat::custom`]
    Custom(String),
}

impl TimestampFormat {
    /// Create a custom format, rejecting strftime strings chrono cannot render
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_structured_logging::core::TimestampFormat;
    ///
    /// assert!(TimestampFormat::custom("%d/%b/%Y:%H:%M:%S %z").is_ok());
    /// assert!(TimestampFormat::custom("%Q").is_err());
    /// ```
    pub fn custom(format_str: impl Into<String>) -> Result<Self> {
        let format_str = format_str.into();
        if StrftimeItems::new(&format_str).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "datefmt",
                format!("invalid strftime format '{}'", format_str),
            ));
        }
        Ok(TimestampFormat::Custom(format_str))
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Console => datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Micros, false),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::with_capacity(32);
                // chrono reports unrenderable specifiers as fmt::Error
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    return TimestampFormat::Iso8601.format(datetime);
                }
                out
            }
        }
    }
}
