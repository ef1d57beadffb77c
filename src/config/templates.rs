//! Bundled configuration templates

use crate::core::{LoggerError, Result};
use std::fs;
use std::path::Path;

/// Development: colored console on stdout plus a JSON file under `logs/`
pub const DEVELOPMENT_TEMPLATE: &str = include_str!("../../config_templates/logging.toml");

/// Production: JSON lines on stdout
pub const PRODUCTION_TEMPLATE: &str = include_str!("../../config_templates/logging.prod.toml");

/// File name and content of every bundled template
pub const TEMPLATES: &[(&str, &str)] = &[
    ("logging.toml", DEVELOPMENT_TEMPLATE),
    ("logging.prod.toml", PRODUCTION_TEMPLATE),
];

/// Write the bundled templates into `config_dir`, creating it if needed
///
/// Without `overwrite`, fails with `ConfigExists` if any destination already
/// exists, before anything is written.
pub fn generate_config_files(config_dir: impl AsRef<Path>, overwrite: bool) -> Result<()> {
    let config_dir = config_dir.as_ref();
    fs::create_dir_all(config_dir).map_err(|e| {
        LoggerError::io_operation("creating config directory", config_dir.display().to_string(), e)
    })?;

    if !overwrite {
        for (file_name, _) in TEMPLATES {
            let dest = config_dir.join(file_name);
            if dest.exists() {
                return Err(LoggerError::ConfigExists { path: dest });
            }
        }
    }

    for (file_name, content) in TEMPLATES {
        let dest = config_dir.join(file_name);
        fs::write(&dest, content).map_err(|e| {
            LoggerError::io_operation("writing config template", dest.display().to_string(), e)
        })?;
    }
    Ok(())
}
