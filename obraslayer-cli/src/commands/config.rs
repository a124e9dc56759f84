//! Configuration management CLI commands.

use clap::Subcommand;
use obraslayer::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init => {
            let path = ConfigFile::ensure_exists()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
    }
}

fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load()?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    println!();
    println!("[sources]");
    println!("base = {}", config.sources.base);
    println!("keys = {}", config.sources.keys.join(", "));
    println!();
    println!("[loader]");
    println!("timeout = {}", config.loader.timeout);
    println!("max_entries = {}", display_optional(config.loader.max_entries));
    println!("max_age = {}", display_optional(config.loader.max_age));
    println!();
    println!("[logging]");
    println!("directory = {}", config.logging.directory.display());
    println!("file = {}", config.logging.file);

    Ok(())
}

fn display_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "(unset)".to_string())
}
