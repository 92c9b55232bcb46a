//! zed-ext CLI
//!
//! Installs and manages Zed editor extensions from the command line.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use zed_ext_core::Lifecycle;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("{} tracing already initialized", "warning:".yellow().bold());
        }
        tracing::debug!("Verbose mode enabled");
    }

    if cli.timeout == 0 {
        return Err(CliError::user("--timeout must be at least 1 second"));
    }

    let lifecycle = Lifecycle::from_settings(&cli.settings())?;
    execute_command(&lifecycle, cli.command)
}

fn execute_command(lifecycle: &Lifecycle, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install { id, version } => {
            commands::run_install(lifecycle, &id, version.as_deref())
        }
        Commands::Remove { id } => commands::run_remove(lifecycle, &id),
        Commands::List { json } => commands::run_list(lifecycle, json),
        Commands::Search { query, json } => commands::run_search(lifecycle, &query, json),
    }
}
