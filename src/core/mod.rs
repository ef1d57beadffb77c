//! Core logger types and traits

pub mod context_logger;
pub mod error;
pub mod error_report;
pub mod formatter;
pub mod handler;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod timestamp;

pub use context_logger::ContextLogger;
pub use error::{LoggerError, Result};
pub use error_report::{error_to_json, error_to_json_with_response, ResponseBody};
pub use formatter::Formatter;
pub use handler::Handler;
pub use log_context::{FieldValue, LogContext};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerRegistry, RegistryBuilder, ROOT_LOGGER};
pub use metrics::LoggerMetrics;
pub use record::{is_reserved_key, CallSite, ExceptionInfo, LogRecord, RESERVED_KEYS};
pub use timestamp::TimestampFormat;
