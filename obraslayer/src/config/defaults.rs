//! Default configuration values.

use std::path::PathBuf;

use super::settings::{ConfigFile, LoaderSettings, LoggingSettings, SourcesSettings};
use crate::loader::DEFAULT_LOAD_TIMEOUT_SECS;

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".obraslayer";

/// Configuration file name inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default resource base: a `data` directory next to the working directory.
pub const DEFAULT_SOURCE_BASE: &str = "data";

/// Datasets loaded when none are configured.
pub const DEFAULT_SOURCE_KEYS: [&str; 2] = ["equipamientos.geojson", "infraestructura_vial.geojson"];

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "obraslayer.log";

/// Get the path to the config directory (~/.obraslayer).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Get the path to the config file (~/.obraslayer/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            sources: SourcesSettings::default(),
            loader: LoaderSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for SourcesSettings {
    fn default() -> Self {
        Self {
            base: DEFAULT_SOURCE_BASE.to_string(),
            keys: DEFAULT_SOURCE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOAD_TIMEOUT_SECS,
            max_entries: None,
            max_age: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
