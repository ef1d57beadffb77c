//! Logger registry and named logger handles
//!
//! `LoggerRegistry` replaces a process-wide logging registry: it is
//! constructed explicitly (programmatically or from configuration) and passed
//! around by reference or clone. Named `Logger` handles are obtained from it.

use super::{
    context_logger::ContextLogger,
    error::{LoggerError, Result},
    handler::Handler,
    log_context::LogContext,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::{CallSite, ExceptionInfo, LogRecord},
};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Name of the root logger
pub const ROOT_LOGGER: &str = "root";

fn is_root(name: &str) -> bool {
    name.is_empty() || name == ROOT_LOGGER
}

/// `"a.b.c"` -> `["a.b.c", "a.b", "a"]`; empty for the root logger
fn ancestry(name: &str) -> Vec<&str> {
    let mut names = Vec::new();
    if is_root(name) {
        return names;
    }
    let mut current = name;
    loop {
        names.push(current);
        match current.rfind('.') {
            Some(idx) => current = &current[..idx],
            None => break,
        }
    }
    names
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

struct LoggerNode {
    level: Option<LogLevel>,
    handlers: Vec<Arc<dyn Handler>>,
    propagate: bool,
}

impl Default for LoggerNode {
    fn default() -> Self {
        Self {
            level: None,
            handlers: Vec::new(),
            propagate: true,
        }
    }
}

struct RegistryInner {
    root: RwLock<LoggerNode>,
    nodes: RwLock<HashMap<String, LoggerNode>>,
    metrics: LoggerMetrics,
}

/// Registry of named, hierarchical loggers and their handlers
///
/// Cloning is cheap; clones share the same loggers and handlers.
///
/// # Example
///
/// ```
/// use rust_structured_logging::prelude::*;
///
/// let registry = LoggerRegistry::builder()
///     .root_level(LogLevel::Debug)
///     .handler(StreamHandler::new(StreamTarget::Stderr, ConsoleFormatter::new()))
///     .build();
///
/// let logger = registry.get_logger("app.http");
/// logger.info("listening");
/// ```
#[derive(Clone)]
pub struct LoggerRegistry {
    inner: Arc<RegistryInner>,
}

impl LoggerRegistry {
    /// Empty registry: root level INFO, no handlers
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                root: RwLock::new(LoggerNode {
                    level: Some(LogLevel::Info),
                    handlers: Vec::new(),
                    propagate: false,
                }),
                nodes: RwLock::new(HashMap::new()),
                metrics: LoggerMetrics::new(),
            }),
        }
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Get a handle to the logger called `name` (dot-separated hierarchy)
    pub fn get_logger(&self, name: impl Into<String>) -> Logger {
        let name = name.into();
        Logger {
            registry: self.clone(),
            name: if name.is_empty() {
                ROOT_LOGGER.to_string()
            } else {
                name
            },
        }
    }

    /// Get a logger that adds `bound` to every record it emits
    pub fn get_context_logger(&self, name: impl Into<String>, bound: LogContext) -> ContextLogger {
        ContextLogger::new(self.get_logger(name), bound)
    }

    fn with_node<R>(&self, name: &str, f: impl FnOnce(&mut LoggerNode) -> R) -> R {
        if is_root(name) {
            f(&mut *self.inner.root.write())
        } else {
            f(self.inner.nodes.write().entry(name.to_string()).or_default())
        }
    }

    pub fn set_level(&self, name: &str, level: LogLevel) {
        self.with_node(name, |node| node.level = Some(level));
    }

    /// Whether records from `name` are also passed to its ancestors' handlers
    pub fn set_propagate(&self, name: &str, propagate: bool) {
        if !is_root(name) {
            self.with_node(name, |node| node.propagate = propagate);
        }
    }

    pub fn add_handler(&self, name: &str, handler: Arc<dyn Handler>) {
        self.with_node(name, |node| node.handlers.push(handler));
    }

    pub fn add_root_handler(&self, handler: Arc<dyn Handler>) {
        self.add_handler(ROOT_LOGGER, handler);
    }

    /// Level of the nearest configured logger in the hierarchy, else the root level
    pub fn effective_level(&self, name: &str) -> LogLevel {
        {
            let nodes = self.inner.nodes.read();
            for candidate in ancestry(name) {
                if let Some(level) = nodes.get(candidate).and_then(|node| node.level) {
                    return level;
                }
            }
        }
        self.inner.root.read().level.unwrap_or_default()
    }

    /// Handlers that should see a record from `name`, in dispatch order
    fn handlers_for(&self, name: &str) -> Vec<Arc<dyn Handler>> {
        let mut handlers = Vec::new();
        {
            let nodes = self.inner.nodes.read();
            for candidate in ancestry(name) {
                if let Some(node) = nodes.get(candidate) {
                    handlers.extend(node.handlers.iter().cloned());
                    if !node.propagate {
                        return handlers;
                    }
                }
            }
        }
        handlers.extend(self.inner.root.read().handlers.iter().cloned());
        handlers
    }

    /// Send a record to every eligible handler
    ///
    /// **Per-Handler Panic Isolation**: each handler call is wrapped in
    /// catch_unwind; a failing or panicking handler is reported on stderr and
    /// counted, and the remaining handlers still receive the record. Nothing
    /// is returned to the caller.
    pub fn dispatch(&self, record: &LogRecord) {
        let metrics = &self.inner.metrics;
        let mut has_error = false;
        let mut handled = 0usize;

        for handler in self.handlers_for(&record.logger_name) {
            if record.level < handler.level() {
                continue;
            }
            handled += 1;

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.handle(record)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if matches!(e, LoggerError::FormatterError { .. } | LoggerError::JsonError(_)) {
                        metrics.record_format_error();
                    } else {
                        metrics.record_handler_error();
                    }
                    eprintln!("[LOGGER ERROR] Handler '{}' failed: {}", handler.name(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    metrics.record_handler_panic();
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked: {}. \
                         Other handlers continue to function.",
                        handler.name(),
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else if handled > 0 {
            metrics.record_logged();
        }
    }

    /// Flush every handler reachable from the root and configured loggers
    pub fn flush(&self) -> Result<()> {
        let mut handlers: Vec<Arc<dyn Handler>> = self.inner.root.read().handlers.clone();
        for node in self.inner.nodes.read().values() {
            handlers.extend(node.handlers.iter().cloned());
        }

        // every handler gets flushed; the first failure is reported
        let mut first_error = None;
        for handler in handlers {
            if let Err(e) = handler.flush() {
                eprintln!("[LOGGER ERROR] Handler '{}' failed to flush: {}", handler.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Get the registry metrics for observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_structured_logging::LoggerRegistry;
    ///
    /// let registry = LoggerRegistry::new();
    /// registry.get_logger("app").info("no handlers yet");
    ///
    /// let metrics = registry.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }
}

impl fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("root_level", &self.inner.root.read().level)
            .field("loggers", &self.inner.nodes.read().len())
            .field("metrics", &self.inner.metrics)
            .finish_non_exhaustive()
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one named logger
///
/// Methods taking no call site use `#[track_caller]` provenance; the logging
/// macros supply module and function names as well.
#[derive(Clone, Debug)]
pub struct Logger {
    registry: LoggerRegistry,
    name: String,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level >= self.registry.effective_level(&self.name)
    }

    /// Build a record and dispatch it, if `level` passes the logger's threshold
    pub fn emit(
        &self,
        call_site: CallSite,
        level: LogLevel,
        message: impl Into<String>,
        extra: Option<&LogContext>,
        exception: Option<ExceptionInfo>,
    ) {
        if !self.is_enabled_for(level) {
            return;
        }

        let empty = LogContext::new();
        let mut record = LogRecord::new(
            level,
            self.name.as_str(),
            message,
            call_site,
            extra.unwrap_or(&empty),
        );
        record.exception = exception;
        self.registry.dispatch(&record);
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

    /// Log with error details attached; the error is only inspected if `level` is enabled
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
        if self.is_enabled_for(level) {
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
    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Debug, message, None);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Info, message, None);
    }

    #[track_caller]
    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Warning, message, None);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Error, message, None);
    }

    #[track_caller]
    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log_at(CallSite::caller(), LogLevel::Critical, message, None);
    }

    /// Log at ERROR with the type, message and traceback of `error`
    #[track_caller]
    pub fn exception<E>(&self, message: impl Into<String>, error: &E)
    where
        E: Error + 'static,
    {
        self.log_error_at(CallSite::caller(), LogLevel::Error, message, error, None);
    }

    /// Wrap this logger with a bound context
    pub fn with_context(&self, bound: LogContext) -> ContextLogger {
        ContextLogger::new(self.clone(), bound)
    }
}

/// Builder for constructing a `LoggerRegistry` with a fluent API
///
/// # Example
/// ```
/// use rust_structured_logging::prelude::*;
///
/// let registry = LoggerRegistry::builder()
///     .root_level(LogLevel::Info)
///     .handler(StreamHandler::new(StreamTarget::Stdout, JsonFormatter::new()))
///     .logger_level("noisy.library", LogLevel::Warning)
///     .build();
/// ```
pub struct RegistryBuilder {
    root_level: LogLevel,
    handlers: Vec<Arc<dyn Handler>>,
    levels: Vec<(String, LogLevel)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            root_level: LogLevel::Info,
            handlers: Vec::new(),
            levels: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn root_level(mut self, level: LogLevel) -> Self {
        self.root_level = level;
        self
    }

    /// Add a handler to the root logger
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Add an already shared handler to the root logger
    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logger_level(mut self, name: impl Into<String>, level: LogLevel) -> Self {
        self.levels.push((name.into(), level));
        self
    }

    pub fn build(self) -> LoggerRegistry {
        let registry = LoggerRegistry::new();
        registry.set_level(ROOT_LOGGER, self.root_level);
        for handler in self.handlers {
            registry.add_root_handler(handler);
        }
        for (name, level) in self.levels {
            registry.set_level(&name, level);
        }
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Collects records instead of writing them
    #[derive(Default)]
    struct CaptureHandler {
        level: Option<LogLevel>,
        records: Mutex<Vec<LogRecord>>,
    }

    impl CaptureHandler {
        fn messages(&self) -> Vec<String> {
            self.records.lock().iter().map(|r| r.message.clone()).collect()
        }
    }

    impl Handler for CaptureHandler {
        fn handle(&self, record: &LogRecord) -> Result<()> {
            self.records.lock().push(record.clone());
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }

        fn level(&self) -> LogLevel {
            self.level.unwrap_or(LogLevel::Debug)
        }
    }

    struct FailingHandler;

    impl Handler for FailingHandler {
        fn handle(&self, _record: &LogRecord) -> Result<()> {
            Err(LoggerError::formatter("test", "unsupported value"))
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingHandler;

    impl Handler for PanickingHandler {
        fn handle(&self, _record: &LogRecord) -> Result<()> {
            panic!("handler exploded");
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn registry_with_capture(root_level: LogLevel) -> (LoggerRegistry, Arc<CaptureHandler>) {
        let capture = Arc::new(CaptureHandler::default());
        let registry = LoggerRegistry::builder()
            .root_level(root_level)
            .shared_handler(capture.clone())
            .build();
        (registry, capture)
    }

    #[test]
    fn test_ancestry() {
        assert_eq!(ancestry("a.b.c"), vec!["a.b.c", "a.b", "a"]);
        assert!(ancestry(ROOT_LOGGER).is_empty());
        assert!(ancestry("").is_empty());
    }

    #[test]
    fn test_root_level_filters() {
        let (registry, capture) = registry_with_capture(LogLevel::Info);
        let logger = registry.get_logger("test-utils-logging");

        logger.warning("hello");
        logger.info("info message");
        logger.debug("debug message");

        assert_eq!(capture.messages(), vec!["hello", "info message"]);
        assert_eq!(registry.metrics().total_logged(), 2);
    }

    #[test]
    fn test_hierarchical_levels() {
        let (registry, _capture) = registry_with_capture(LogLevel::Info);
        registry.set_level("a", LogLevel::Error);
        registry.set_level("a.b", LogLevel::Debug);

        assert_eq!(registry.effective_level("a.b.c"), LogLevel::Debug);
        assert_eq!(registry.effective_level("a.x"), LogLevel::Error);
        assert_eq!(registry.effective_level("other"), LogLevel::Info);
        assert_eq!(registry.effective_level(ROOT_LOGGER), LogLevel::Info);
    }

    #[test]
    fn test_handler_level_filters() {
        let capture = Arc::new(CaptureHandler {
            level: Some(LogLevel::Error),
            ..Default::default()
        });
        let registry = LoggerRegistry::builder()
            .root_level(LogLevel::Debug)
            .shared_handler(capture.clone())
            .build();

        let logger = registry.get_logger("svc");
        logger.info("skipped");
        logger.error("kept");

        assert_eq!(capture.messages(), vec!["kept"]);
    }

    #[test]
    fn test_propagation_to_root() {
        let (registry, root_capture) = registry_with_capture(LogLevel::Debug);
        let child_capture = Arc::new(CaptureHandler::default());
        registry.add_handler("app", child_capture.clone());

        registry.get_logger("app.db").info("both");
        registry.set_propagate("app", false);
        registry.get_logger("app.db").info("child only");

        assert_eq!(child_capture.messages(), vec!["both", "child only"]);
        assert_eq!(root_capture.messages(), vec!["both"]);
    }

    #[test]
    fn test_failing_handler_does_not_stop_others() {
        let (registry, capture) = registry_with_capture(LogLevel::Debug);
        registry.add_root_handler(Arc::new(FailingHandler));
        registry.add_root_handler(Arc::new(PanickingHandler));

        let logger = registry.get_logger("svc");
        logger.info("first");
        logger.info("second");

        assert_eq!(capture.messages(), vec!["first", "second"]);
        assert_eq!(registry.metrics().dropped_count(), 2);
        assert_eq!(registry.metrics().format_errors(), 2);
        assert_eq!(registry.metrics().handler_panics(), 2);
    }

    #[test]
    fn test_exception_attached_only_when_requested() {
        let (registry, capture) = registry_with_capture(LogLevel::Debug);
        let logger = registry.get_logger("test-exception");

        logger.error("plain error");
        let err = "oops".parse::<f64>().unwrap_err();
        logger.exception("Parse error occurred", &err);

        let records = capture.records.lock();
        assert!(records[0].exception.is_none());
        let exception = records[1].exception.as_ref().expect("exception info");
        assert_eq!(exception.type_name, "ParseFloatError");
        assert_eq!(records[1].level, LogLevel::Error);
    }

    #[test]
    fn test_track_caller_provenance() {
        let (registry, capture) = registry_with_capture(LogLevel::Debug);
        registry.get_logger("svc").info("where");

        let records = capture.records.lock();
        assert_eq!(records[0].module, "logger");
        assert!(records[0].line > 0);
    }

    #[test]
    fn test_root_logger_name() {
        let registry = LoggerRegistry::new();
        assert_eq!(registry.get_logger("").name(), ROOT_LOGGER);
    }

    struct FlushFailingHandler;

    impl Handler for FlushFailingHandler {
        fn handle(&self, _record: &LogRecord) -> Result<()> {
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            Err(LoggerError::handler("flush-failing", "disk full"))
        }

        fn name(&self) -> &str {
            "flush-failing"
        }
    }

    #[derive(Default)]
    struct FlushCounter {
        flushes: Mutex<usize>,
    }

    impl Handler for FlushCounter {
        fn handle(&self, _record: &LogRecord) -> Result<()> {
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            *self.flushes.lock() += 1;
            Ok(())
        }

        fn name(&self) -> &str {
            "flush-counter"
        }
    }

    #[test]
    fn test_flush_reaches_every_handler_after_failure() {
        let root_counter = Arc::new(FlushCounter::default());
        let child_counter = Arc::new(FlushCounter::default());
        let registry = LoggerRegistry::builder()
            .handler(FlushFailingHandler)
            .shared_handler(root_counter.clone())
            .build();
        registry.add_handler("app", child_counter.clone());

        let result = registry.flush();

        assert!(matches!(result, Err(LoggerError::HandlerError { .. })));
        assert_eq!(*root_counter.flushes.lock(), 1);
        assert_eq!(*child_counter.flushes.lock(), 1);
    }

    #[test]
    fn test_registry_debug_output() {
        let registry = LoggerRegistry::new();
        registry.set_level("app", LogLevel::Warning);

        let rendered = format!("{:?}", registry);
        assert!(rendered.starts_with("LoggerRegistry"));
        assert!(rendered.contains("loggers: 1"));

        let logger = registry.get_logger("app");
        assert!(format!("{:?}", logger).contains("\"app\""));
    }
}
