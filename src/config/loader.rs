//! Configuration loading and registry wiring.

use super::schema::{FormatterConfig, HandlerConfig, LoggingConfig};
use super::validation::{parse_level, validate_config};
use crate::core::{
    Formatter, Handler, LogLevel, LoggerError, LoggerRegistry, Result, TimestampFormat, ROOT_LOGGER,
};
use crate::formatters::{ConsoleFormatter, JsonFormatter};
use crate::handlers::{FileHandler, StreamHandler};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl LoggingConfig {
    /// Read, parse and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoggerError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logging configuration", path.display().to_string(), e)
        })?;
        Self::parse(&content, path.to_path_buf())
    }

    /// Parse and validate a TOML document held in memory
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, PathBuf::from("<string>"))
    }

    fn parse(content: &str, path: PathBuf) -> Result<Self> {
        let config: LoggingConfig =
            toml::from_str(content).map_err(|source| LoggerError::ConfigParse { path, source })?;
        validate_config(&config)?;
        Ok(config)
    }
}

/// Create the parent directory of every file handler's log file
///
/// Idempotent; bare file names (no parent) are skipped.
pub fn ensure_log_directories(config: &LoggingConfig) -> Result<()> {
    for handler in config.handlers.values() {
        let Some(parent) = handler.filename().and_then(Path::parent) else {
            continue;
        };
        if parent.as_os_str().is_empty() {
            continue;
        }
        fs::create_dir_all(parent).map_err(|e| {
            LoggerError::io_operation("creating log directory", parent.display().to_string(), e)
        })?;
    }
    Ok(())
}

/// Load `path` and build a registry from it
///
/// Each name in `suppress_loggers` is then set to WARNING.
///
/// # Example
///
/// ```no_run
/// use rust_structured_logging::config::configure_logging;
///
/// let registry = configure_logging("config/logging.toml", &["hyper", "custom.noisy.logger"])?;
/// registry.get_logger("app").info("configured");
/// # Ok::<(), rust_structured_logging::LoggerError>(())
/// ```
pub fn configure_logging(path: impl AsRef<Path>, suppress_loggers: &[&str]) -> Result<LoggerRegistry> {
    let config = LoggingConfig::load(path)?;
    let registry = LoggerRegistry::from_config(&config)?;
    for name in suppress_loggers {
        registry.set_level(name, LogLevel::Warning);
    }
    Ok(registry)
}

fn build_formatter(
    config: &LoggingConfig,
    name: Option<&str>,
    color_capable: bool,
) -> Result<Box<dyn Formatter>> {
    let Some(name) = name else {
        return Ok(Box::new(ConsoleFormatter::new()));
    };
    let spec = config
        .formatters
        .get(name)
        .ok_or_else(|| LoggerError::config("formatters", format!("unknown formatter '{}'", name)))?;

    Ok(match spec {
        FormatterConfig::Console {
            format,
            datefmt,
            colors,
        } => {
            let mut formatter = match format {
                Some(template) => ConsoleFormatter::with_format(template)?,
                None => ConsoleFormatter::new(),
            };
            if let Some(datefmt) = datefmt {
                formatter = formatter.with_timestamp_format(TimestampFormat::custom(datefmt.as_str())?);
            }
            Box::new(formatter.with_colors(colors.resolve(color_capable)))
        }
        FormatterConfig::Json { pretty: true } => Box::new(JsonFormatter::new_pretty()),
        FormatterConfig::Json { pretty: false } => Box::new(JsonFormatter::new()),
    })
}

fn build_handler(config: &LoggingConfig, name: &str, spec: &HandlerConfig) -> Result<Arc<dyn Handler>> {
    let level = match spec.level() {
        Some(level) => parse_level(&format!("handlers.{}", name), level)?,
        None => LogLevel::Debug,
    };

    let handler: Arc<dyn Handler> = match spec {
        HandlerConfig::Stream { stream, formatter, .. } => {
            let formatter = build_formatter(config, formatter.as_deref(), stream.is_terminal())?;
            Arc::new(
                StreamHandler::from_boxed(*stream, formatter)
                    .with_level(level)
                    .with_name(name),
            )
        }
        HandlerConfig::File {
            filename,
            mode,
            formatter,
            ..
        } => {
            // files never get ANSI colors unless forced
            let formatter = build_formatter(config, formatter.as_deref(), false)?;
            Arc::new(
                FileHandler::from_boxed(filename, *mode, formatter)?
                    .with_level(level)
                    .with_name(name),
            )
        }
    };
    Ok(handler)
}

impl LoggerRegistry {
    /// Build a registry from an already loaded configuration
    ///
    /// Log directories are created before any file handler is opened.
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        validate_config(config)?;
        ensure_log_directories(config)?;

        let mut handlers: IndexMap<&str, Arc<dyn Handler>> = IndexMap::new();
        for (name, spec) in &config.handlers {
            handlers.insert(name.as_str(), build_handler(config, name, spec)?);
        }
        let lookup = |name: &String| {
            handlers
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| LoggerError::config("handlers", format!("unknown handler '{}'", name)))
        };

        let registry = LoggerRegistry::new();

        let root_level = match config.root.level.as_deref() {
            Some(level) => parse_level("root", level)?,
            None => LogLevel::Info,
        };
        registry.set_level(ROOT_LOGGER, root_level);
        for name in &config.root.handlers {
            registry.add_root_handler(lookup(name)?);
        }

        for (logger_name, spec) in &config.loggers {
            if let Some(level) = spec.level.as_deref() {
                registry.set_level(logger_name, parse_level(&format!("loggers.{}", logger_name), level)?);
            }
            registry.set_propagate(logger_name, spec.propagate);
            for name in &spec.handlers {
                registry.add_handler(logger_name, lookup(name)?);
            }
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file() {
        let err = LoggingConfig::load("/definitely/not/here/logging.toml").unwrap_err();
        assert!(matches!(err, LoggerError::ConfigNotFound { .. }));
        assert!(err
            .to_string()
            .starts_with("Logging configuration file not found"));
    }

    #[test]
    fn test_malformed_toml() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logging.toml");
        fs::write(&path, "version = [")?;

        let err = LoggingConfig::load(&path).unwrap_err();
        assert!(matches!(err, LoggerError::ConfigParse { .. }));
        Ok(())
    }

    #[test]
    fn test_unknown_class_is_parse_error() {
        let err = LoggingConfig::from_toml_str(
            r#"
            version = 1
            [handlers.x]
            class = "syslog"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LoggerError::ConfigParse { .. }));
    }

    #[test]
    fn test_ensure_log_directories() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("a").join("b").join("app.json");
        let doc = format!(
            r#"
            version = 1
            [handlers.file]
            class = "file"
            filename = {:?}
            [handlers.bare]
            class = "file"
            filename = "bare.log"
            "#,
            nested.display().to_string()
        );
        let config = LoggingConfig::from_toml_str(&doc)?;

        ensure_log_directories(&config)?;
        ensure_log_directories(&config)?;
        assert!(nested.parent().map(Path::is_dir).unwrap_or(false));
        assert!(!nested.exists());
        Ok(())
    }

    #[test]
    fn test_from_config_levels_and_propagation() -> Result<()> {
        let config = LoggingConfig::from_toml_str(
            r#"
            version = 1
            [handlers.err]
            class = "stream"
            stream = "stderr"
            level = "ERROR"

            [loggers."noisy.library"]
            level = "WARNING"
            propagate = false

            [root]
            level = "DEBUG"
            handlers = ["err"]
            "#,
        )?;
        let registry = LoggerRegistry::from_config(&config)?;

        assert_eq!(registry.effective_level("app"), LogLevel::Debug);
        assert_eq!(registry.effective_level("noisy.library.http"), LogLevel::Warning);
        Ok(())
    }

    #[test]
    fn test_root_level_defaults_to_info() -> Result<()> {
        let registry = LoggerRegistry::from_config(&LoggingConfig::from_toml_str("version = 1")?)?;
        assert_eq!(registry.effective_level("anything"), LogLevel::Info);
        Ok(())
    }
}
