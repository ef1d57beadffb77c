//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They record the
//! calling module, function and line, and accept call-site extra fields.
//! They work with both `Logger` and `ContextLogger`.
//!
//! # Examples
//!
//! ```
//! use rust_structured_logging::prelude::*;
//! use rust_structured_logging::{info, warning};
//!
//! let registry = LoggerRegistry::new();
//! let logger = registry.get_logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With extra fields
//! warning!(logger, { "user_id" => 42, "action" => "login" }, "Slow request: {}ms", 950);
//! ```

/// Name of the enclosing function, without its module path.
///
/// Closures report the function they are defined in.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let mut name = name;
        while let Some(stripped) = name.strip_suffix("::{{closure}}") {
            name = stripped;
        }
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_structured_logging::prelude::*;
/// # let logger = LoggerRegistry::new().get_logger("docs");
/// use rust_structured_logging::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warning, { "retry" => 3 }, "Retrying {}", "upload");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, { $($key:literal => $value:expr),* $(,)? }, $($arg:tt)+) => {{
        let extra = $crate::LogContext::new()$(.with_field($key, $value))*;
        $logger.log_at(
            $crate::CallSite::new(::std::module_path!(), $crate::function_name!(), ::std::line!()),
            $level,
            ::std::format!($($arg)+),
            ::std::option::Option::Some(&extra),
        )
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $crate::CallSite::new(::std::module_path!(), $crate::function_name!(), ::std::line!()),
            $level,
            ::std::format!($($arg)+),
            ::std::option::Option::None,
        )
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logging::prelude::*;
/// # let logger = LoggerRegistry::new().get_logger("docs");
/// use rust_structured_logging::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logging::prelude::*;
/// # let logger = LoggerRegistry::new().get_logger("docs");
/// use rust_structured_logging::error;
/// error!(logger, { "path" => "/var/data" }, "Failed to open file: {}", "permission denied");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
