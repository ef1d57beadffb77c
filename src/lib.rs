//! # Rust Structured Logging
//!
//! Structured, context-aware logging for services: every record can carry
//! typed extra fields and is rendered either as one JSON object per line or
//! as a human-readable, optionally colored console line.
//!
//! ## Features
//!
//! - **JSON Lines**: fixed keys first, then extra fields in insertion order
//! - **Console Output**: aligned severity tags with ANSI colors
//! - **Bound Context**: `ContextLogger` merges call-site fields over bound fields
//! - **TOML Configuration**: formatters, handlers and hierarchical loggers
//! - **Thread Safe**: handlers serialize writes, so lines never interleave
//!
//! ## Example
//!
//! ```
//! use rust_structured_logging::prelude::*;
//!
//! let registry = LoggerRegistry::builder()
//!     .handler(StreamHandler::new(StreamTarget::Stdout, JsonFormatter::new()))
//!     .build();
//!
//! let logger = registry.get_context_logger("api", LogContext::new().with_field("service", "api"));
//! logger.log_with_extra(LogLevel::Info, "User action", &LogContext::new().with_field("user_id", 456));
//! ```

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::config::{configure_logging, LoggingConfig};
    pub use crate::core::{
        CallSite, ContextLogger, ExceptionInfo, FieldValue, Formatter, Handler, LogContext,
        LogLevel, LogRecord, Logger, LoggerError, LoggerMetrics, LoggerRegistry, Result,
        TimestampFormat,
    };
    pub use crate::formatters::{ColorChoice, ConsoleFormatter, JsonFormatter};
    pub use crate::handlers::{FileHandler, FileMode, StreamHandler, StreamTarget};
}

pub use crate::config::{configure_logging, ensure_log_directories, generate_config_files, LoggingConfig};
pub use crate::core::{
    error_to_json, error_to_json_with_response, CallSite, ContextLogger, ExceptionInfo,
    FieldValue, Formatter, Handler, LogContext, LogLevel, LogRecord, Logger, LoggerError,
    LoggerMetrics, LoggerRegistry, RegistryBuilder, ResponseBody, Result, TimestampFormat,
};
pub use crate::formatters::{ConsoleFormatter, JsonFormatter};
pub use crate::handlers::{FileHandler, StreamHandler};
