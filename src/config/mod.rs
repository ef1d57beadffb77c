//! Configuration management.
//!
//! ```text
//! logging.toml
//!     → loader.rs      (read & deserialize)
//!     → validation.rs  (versions, levels, references)
//!     → LoggingConfig
//!     → LoggerRegistry::from_config (directories, formatters, handlers, loggers)
//! ```

pub mod loader;
pub mod schema;
pub mod templates;
pub mod validation;

pub use loader::{configure_logging, ensure_log_directories};
pub use schema::{FormatterConfig, HandlerConfig, LoggerConfig, LoggingConfig, RootConfig, CONFIG_VERSION};
pub use templates::{generate_config_files, DEVELOPMENT_TEMPLATE, PRODUCTION_TEMPLATE};
pub use validation::validate_config;
