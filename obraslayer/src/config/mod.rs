//! User configuration.
//!
//! Reads and writes `~/.obraslayer/config.ini` and turns its sections into
//! the typed settings the loader and logging use.
//!
//! # Example
//!
//! ```
//! use obraslayer::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let loader = config.loader.to_loader_config();
//! assert_eq!(loader.timeout().as_secs(), 30);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    config_directory, config_file_path, CONFIG_FILE_NAME, DEFAULT_LOG_FILE, DEFAULT_SOURCE_BASE,
    DEFAULT_SOURCE_KEYS,
};
pub use file::ConfigFileError;
pub use settings::{ConfigFile, LoaderSettings, LoggingSettings, SourcesSettings};
