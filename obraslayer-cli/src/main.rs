//! ObrasLayer CLI - Command-line interface
//!
//! Loads the configured project datasets and prints summaries, filtered
//! listings and cache diagnostics.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::list::ListArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "obraslayer")]
#[command(version = obraslayer::VERSION)]
#[command(about = "Inspect public-works project datasets", long_about = None)]
struct Cli {
    /// Dataset base URL or directory, overriding the config file
    #[arg(long, global = true)]
    base: Option<String>,

    /// Echo log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-dataset counts, status distribution and budget totals
    Summary {
        /// Resource keys to load (defaults to the configured keys)
        keys: Vec<String>,
    },

    /// List units matching filters
    List(ListArgs),

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Load the datasets and show resource cache statistics
    CacheStats {
        /// Resource keys to load (defaults to the configured keys)
        keys: Vec<String>,

        /// Number of load passes
        #[arg(long, default_value = "2")]
        passes: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Summary { keys } => {
            let runner = CliRunner::new(cli.base, cli.verbose)?;
            commands::summary::run(&runner, &keys).await
        }
        Commands::List(args) => {
            let runner = CliRunner::new(cli.base, cli.verbose)?;
            commands::list::run(&runner, &args).await
        }
        Commands::CacheStats { keys, passes } => {
            let runner = CliRunner::new(cli.base, cli.verbose)?;
            commands::cache::run_stats(&runner, &keys, passes).await
        }
    }
}
