//! Formatter trait: renders a record into a ready-to-write line

use super::{error::Result, record::LogRecord};

/// A pure renderer from [`LogRecord`] to a single line of text.
///
/// Implementations hold only immutable configuration, so one instance can be
/// shared by any number of threads. Formatting the same record twice yields
/// identical output.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> Result<String>;
    fn name(&self) -> &str;
}
