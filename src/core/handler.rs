//! Handler trait for log output destinations

use super::{error::Result, log_level::LogLevel, record::LogRecord};

/// Formats records and writes them to one destination.
///
/// Handlers take `&self`; each implementation serializes its own writes.
pub trait Handler: Send + Sync {
    fn handle(&self, record: &LogRecord) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;

    /// Records below this level are skipped by the logger
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }
}
