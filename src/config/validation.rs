//! Configuration validation.
//!
//! Serde handles syntax; this checks what serde cannot: the document version,
//! level names, console templates and date formats, and that every handler
//! and formatter reference resolves.

use super::schema::{FormatterConfig, LoggingConfig, CONFIG_VERSION};
use crate::core::{LogLevel, LoggerError, Result, TimestampFormat};
use crate::formatters::ConsoleFormatter;

/// Parse a configured level name
pub(crate) fn parse_level(component: &str, name: &str) -> Result<LogLevel> {
    name.parse::<LogLevel>()
        .map_err(|_| LoggerError::config(component, format!("unknown level '{}'", name)))
}

/// Check the document for semantic errors, stopping at the first one
pub fn validate_config(config: &LoggingConfig) -> Result<()> {
    if config.version != CONFIG_VERSION {
        return Err(LoggerError::config(
            "version",
            format!(
                "unsupported version {} (expected {})",
                config.version, CONFIG_VERSION
            ),
        ));
    }

    for (name, formatter) in &config.formatters {
        if let FormatterConfig::Console { format, datefmt, .. } = formatter {
            if let Some(template) = format {
                ConsoleFormatter::with_format(template).map_err(|e| {
                    LoggerError::config(format!("formatters.{}", name), e.to_string())
                })?;
            }
            if let Some(datefmt) = datefmt {
                TimestampFormat::custom(datefmt.as_str()).map_err(|e| {
                    LoggerError::config(format!("formatters.{}", name), e.to_string())
                })?;
            }
        }
    }

    for (name, handler) in &config.handlers {
        let component = format!("handlers.{}", name);
        if let Some(level) = handler.level() {
            parse_level(&component, level)?;
        }
        if let Some(formatter) = handler.formatter() {
            if !config.formatters.contains_key(formatter) {
                return Err(LoggerError::config(
                    component,
                    format!("unknown formatter '{}'", formatter),
                ));
            }
        }
        if handler
            .filename()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(LoggerError::config(component, "filename must not be empty"));
        }
    }

    let logger_refs = config
        .loggers
        .iter()
        .map(|(name, logger)| (format!("loggers.{}", name), logger.level.as_deref(), &logger.handlers))
        .chain(std::iter::once((
            "root".to_string(),
            config.root.level.as_deref(),
            &config.root.handlers,
        )));

    for (component, level, handlers) in logger_refs {
        if let Some(level) = level {
            parse_level(&component, level)?;
        }
        for handler in handlers {
            if !config.handlers.contains_key(handler) {
                return Err(LoggerError::config(
                    component,
                    format!("unknown handler '{}'", handler),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> LoggingConfig {
        toml::from_str(doc).expect("valid TOML")
    }

    fn component_of(err: LoggerError) -> String {
        match err {
            LoggerError::InvalidConfiguration { component, .. } => component,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert!(validate_config(&parse("version = 1")).is_ok());
    }

    #[test]
    fn test_wrong_version() {
        let err = validate_config(&parse("version = 2")).unwrap_err();
        assert_eq!(component_of(err), "version");
    }

    #[test]
    fn test_unknown_formatter_reference() {
        let config = parse(
            r#"
            version = 1
            [handlers.console]
            class = "stream"
            formatter = "missing"
            "#,
        );
        let err = validate_config(&config).unwrap_err();
        assert_eq!(component_of(err), "handlers.console");
    }

    #[test]
    fn test_unknown_handler_reference() {
        let config = parse(
            r#"
            version = 1
            [root]
            handlers = ["nowhere"]
            "#,
        );
        let err = validate_config(&config).unwrap_err();
        assert_eq!(component_of(err), "root");
    }

    #[test]
    fn test_bad_level_names() {
        let config = parse(
            r#"
            version = 1
            [loggers."app.db"]
            level = "LOUD"
            "#,
        );
        let err = validate_config(&config).unwrap_err();
        assert_eq!(component_of(err), "loggers.app.db");

        let config = parse(
            r#"
            version = 1
            [handlers.out]
            class = "stream"
            level = "verbose"
            "#,
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_level_aliases_accepted() {
        let config = parse(
            r#"
            version = 1
            [loggers.a]
            level = "warn"
            [root]
            level = "fatal"
            "#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_console_template() {
        let config = parse(
            r#"
            version = 1
            [formatters.console]
            class = "console"
            format = "{asctime} {message}"
            "#,
        );
        let err = validate_config(&config).unwrap_err();
        assert_eq!(component_of(err), "formatters.console");
    }

    #[test]
    fn test_bad_datefmt() {
        let config = parse(
            r#"
            version = 1
            [formatters.console]
            class = "console"
            datefmt = "%Q"
            "#,
        );
        assert!(validate_config(&config).is_err());
    }
}
