//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use obraslayer::config::ConfigFileError;
use obraslayer::loader::{LoadError, SourceError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create the resource source
    Source(SourceError),
    /// Every requested resource failed to load
    NothingLoaded(Vec<(String, LoadError)>),
    /// Failed to serialize output
    Output(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::NothingLoaded(errors) => {
                eprintln!();
                for (key, error) in errors {
                    eprintln!("  {}: {}", key, error);
                }
                eprintln!();
                eprintln!("Check that [sources] base in the config file (or --base) points at");
                eprintln!("the directory or URL holding the datasets.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'obraslayer config path' to locate the configuration file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Source(e) => write!(f, "Failed to create resource source: {}", e),
            CliError::NothingLoaded(errors) => {
                write!(f, "None of the {} requested resources could be loaded", errors.len())
            }
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Source(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Source(e)
    }
}
