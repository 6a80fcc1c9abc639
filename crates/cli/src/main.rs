//! # DO NOT SUBMIT CLI
//!
//! Command-line interface for checking a single pull request for DO NOT SUBMIT markers.
//!
//! # Commands
//!
//! - `check` - Report whether a pull request needs a hold, and optionally apply the hold label
//!
//! # Examples
//!
//! ```bash
//! # Report only
//! GITHUB_TOKEN=... donotsubmit check --repo owner/repo --pr 123
//!
//! # Add or remove the hold label
//! GITHUB_TOKEN=... donotsubmit check --repo owner/repo --pr 123 --apply
//! ```
//!
//! The exit code is 0 when no hold is wanted and 1 when the pull request adds a marker. Other
//! failures use the codes of [`errors::CliError`].

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use std::process::{ExitCode, Termination};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command implementations for the CLI.
mod commands;

/// Error types specific to the CLI.
mod errors;

use commands::check::CheckArgs;
use errors::CliError;

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "DONOTSUBMIT_LOG";

/// Command-line interface structure for the DO NOT SUBMIT checker.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Check a pull request for DO NOT SUBMIT markers
    Check(CheckArgs),
}

/// Installs the pretty log output, filtered by `DONOTSUBMIT_LOG`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    if let Err(e) = tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(filter)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

/// Dispatches to the command handler.
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Check(args) => commands::check::execute(args).await,
    }
}

/// Main entry point for the DO NOT SUBMIT CLI.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ CliError::HoldWanted(_)) => {
            warn!("{}", e);
            e.report()
        }
        Err(e) => {
            error!("Error checking the pull request: {}", e);
            eprintln!("{}", e);
            e.report()
        }
    }
}
