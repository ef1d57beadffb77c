//! Configuration schema definitions.
//!
//! Mirrors the TOML document: named formatters, named handlers that refer to
//! formatters, named loggers and the root logger that refer to handlers.

use crate::formatters::ColorChoice;
use crate::handlers::{FileMode, StreamTarget};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The only supported document version
pub const CONFIG_VERSION: u32 = 1;

/// Root of a logging configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub version: u32,

    /// Formatter definitions, referenced by handlers.
    #[serde(default)]
    pub formatters: IndexMap<String, FormatterConfig>,

    /// Handler definitions, referenced by loggers.
    #[serde(default)]
    pub handlers: IndexMap<String, HandlerConfig>,

    /// Per-logger settings keyed by dotted logger name.
    #[serde(default)]
    pub loggers: IndexMap<String, LoggerConfig>,

    #[serde(default)]
    pub root: RootConfig,
}

/// Formatter definition, selected by `class`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum FormatterConfig {
    Console {
        /// Line template; defaults to `DEFAULT_FORMAT`.
        #[serde(default)]
        format: Option<String>,

        /// strftime format for `{time}`.
        #[serde(default)]
        datefmt: Option<String>,

        #[serde(default)]
        colors: ColorChoice,
    },
    Json {
        #[serde(default)]
        pretty: bool,
    },
}

/// Handler definition, selected by `class`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum HandlerConfig {
    Stream {
        #[serde(default)]
        stream: StreamTarget,
        #[serde(default)]
        level: Option<String>,
        #[serde(default)]
        formatter: Option<String>,
    },
    File {
        filename: PathBuf,
        #[serde(default)]
        mode: FileMode,
        #[serde(default)]
        level: Option<String>,
        #[serde(default)]
        formatter: Option<String>,
    },
}

impl HandlerConfig {
    pub fn level(&self) -> Option<&str> {
        match self {
            HandlerConfig::Stream { level, .. } | HandlerConfig::File { level, .. } => {
                level.as_deref()
            }
        }
    }

    pub fn formatter(&self) -> Option<&str> {
        match self {
            HandlerConfig::Stream { formatter, .. } | HandlerConfig::File { formatter, .. } => {
                formatter.as_deref()
            }
        }
    }

    /// Log file path, for file handlers
    pub fn filename(&self) -> Option<&Path> {
        match self {
            HandlerConfig::File { filename, .. } => Some(filename),
            HandlerConfig::Stream { .. } => None,
        }
    }
}

/// Settings for one named logger.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    /// Unset means inherit from the nearest ancestor.
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub handlers: Vec<String>,

    #[serde(default = "default_propagate")]
    pub propagate: bool,
}

fn default_propagate() -> bool {
    true
}

/// Settings for the root logger.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    /// Defaults to INFO.
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub handlers: Vec<String>,
}
