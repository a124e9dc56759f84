//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::loader::LoaderConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub sources: SourcesSettings,
    pub loader: LoaderSettings,
    pub logging: LoggingSettings,
}

/// Where datasets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcesSettings {
    /// Base URL (`http://`, `https://`) or local directory
    pub base: String,
    /// Resource keys loaded by default, in order
    pub keys: Vec<String>,
}

/// Resource cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    /// Fetch timeout in seconds
    pub timeout: u64,
    /// Maximum ready entries; unbounded when `None`
    pub max_entries: Option<usize>,
    /// Entry lifetime in seconds; no expiry when `None`
    pub max_age: Option<u64>,
}

impl LoaderSettings {
    pub fn to_loader_config(&self) -> LoaderConfig {
        LoaderConfig::new()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_entries(self.max_entries)
            .with_max_age(self.max_age.map(Duration::from_secs))
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
