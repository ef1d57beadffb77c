//! Formatter implementations

pub mod console;
pub mod json;

pub use console::{ColorChoice, ConsoleFormatter, DEFAULT_FORMAT};
pub use json::JsonFormatter;

pub use crate::core::Formatter;
