//! Error types for the logging system

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration file does not exist
    #[error("Logging configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but is not valid TOML for the schema
    #[error("Failed to parse logging configuration '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Generated configuration would overwrite an existing file
    #[error(
        "Configuration file already exists: {}. Remove existing files or choose a different directory.",
        path.display()
    )]
    ConfigExists { path: PathBuf },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },

    /// Handler failed to write a record
    #[error("Handler error ({handler}): {message}")]
    HandlerError { handler: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a handler error
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::HandlerError {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while loading or generating configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            LoggerError::ConfigNotFound { .. }
                | LoggerError::ConfigParse { .. }
                | LoggerError::ConfigExists { .. }
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("handlers.file", "unknown formatter 'xml'");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.is_configuration_error());

        let err = LoggerError::handler("file", "disk full");
        assert!(matches!(err, LoggerError::HandlerError { .. }));
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::ConfigNotFound {
            path: PathBuf::from("/non/existent/path.toml"),
        };
        assert_eq!(
            err.to_string(),
            "Logging configuration file not found: /non/existent/path.toml"
        );

        let err = LoggerError::ConfigExists {
            path: PathBuf::from("config/logging.toml"),
        };
        assert!(err
            .to_string()
            .starts_with("Configuration file already exists: config/logging.toml"));

        let err = LoggerError::formatter("JSON", "Invalid field type");
        assert_eq!(err.to_string(), "Formatter error (JSON): Invalid field type");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("creating log directory", "logs/", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("creating log directory"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
