//! Logger wrapper that injects a bound context into every record

use super::{
    log_context::LogContext,
    log_level::LogLevel,
    logger::Logger,
    record::{CallSite, ExceptionInfo},
};
use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;

/// A `Logger` with fields attached to every record it emits
///
/// Call-site fields are merged over the bound fields: on a key conflict the
/// call-site value wins. The bound context itself is never modified.
///
/// # Example
///
/// ```
/// use rust_structured_logging::prelude::*;
///
/// let registry = LoggerRegistry::new();
/// let logger = registry.get_context_logger(
///     "api",
///     LogContext::new().with_field("service", "api").with_field("version", "1.0"),
/// );
///
/// logger.info("request handled");
/// logger.log_with_extra(
///     LogLevel::Info,
///     "user action",
///     &LogContext::new().with_field("user_id", 456),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ContextLogger {
    logger: Logger,
    bound: Arc<LogContext>,
}

impl ContextLogger {
    pub fn new(logger: Logger, bound: LogContext) -> Self {
        Self {
            logger,
            bound: Arc::new(bound),
        }
    }

    pub fn bound(&self) -> &LogContext {
        &self.bound
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn name(&self) -> &str {
        self.logger.name()
    }

    /// New wrapper with `fields` layered over the current bound context
    #[must_use]
    pub fn bind(&self, fields: &LogContext) -> Self {
        let mut bound = LogContext::clone(&self.bound);
        bound.extend_from(fields);
        Self::new(self.logger.clone(), bound)
    }

    /// Bound context with `call` merged over it
    pub fn merge_extra<'a>(&'a self, call: Option<&LogContext>) -> Cow<'a, LogContext> {
        match call {
            None => Cow::Borrowed(self.bound.as_ref()),
            Some(call) if call.is_empty() => Cow::Borrowed(self.bound.as_ref()),
            Some(call) => {
                let mut merged = LogContext::clone(&self.bound);
                merged.extend_from(call);
                Cow::Owned(merged)
            }
        }
    }

    /// Entry point used by the logging macros
    pub fn log_at(
        &self,
        call_site: CallSite,
        level: LogLevel,
        message: impl Into<String>,
        extra: Option<&LogContext>,
    ) {
        self.emit(call_site, level, message, extra, None);
    }

    pub fn emit(
        &self,
        call_site: CallSite,
        level: LogLevel,
        message: impl Into<String>,
        extra: Option<&LogContext>,
        exception: Option<ExceptionInfo>,
    ) {
        if !self.logger.is_enabled_for(level) {
            return;
        }
        let merged = self.merge_extra(extra);
        self.logger
            .emit(call_site, level, message, Some(merged.as_ref()), exception);
    }

    pub fn log_error_at<E>(
        &self,
        call_site: CallSite,
        level: LogLevel,
        message: impl Into<String>,
        error: &E,
        extra: Option<&LogContext>,
    ) where
        E: Error + 'static,
    {
        if self.logger.is_enabled_for(level) {
            self.emit(call_site, level, message, extra, Some(ExceptionInfo::from_error(error)));
        }
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_at(CallSite::caller(), level, message, None);
    }

    #[track_caller]
    pub fn log_with_extra(&self, level: LogLevel, message: impl Into<String>, extra: &LogContext) {
        self.log_at(CallSite::caller(), level, message, Some(extra));
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Debug, message, None);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Info, message, None);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Warning, message, None);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Error, message, None);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Critical, message, None);
    }

    /// Log at ERROR with error details and the bound context
    #[track_caller]
    pub fn exception<E>(&self, message: impl Into<String>, error: &E)
    where
        E: Error + 'static,
    {
        self.log_error_at(CallSite::caller(), LogLevel::Error, message, error, None);
    }
}
