//! Install command

use colored::Colorize;
use zed_ext_core::{IndexSync, Lifecycle};

use crate::error::Result;

/// Run the install command
pub fn run_install(lifecycle: &Lifecycle, id: &str, version: Option<&str>) -> Result<()> {
    let paths = lifecycle.paths()?;

    println!("{} Looking up extension {}...", "=>".blue().bold(), id.cyan());
    let entry = lifecycle.resolve(id, version)?;

    println!(
        "{} Installing {} v{}...",
        "=>".blue().bold(),
        entry.name.cyan(),
        entry.version
    );
    let outcome = lifecycle.install_entry(&paths, entry)?;

    if outcome.replaced {
        println!("   {} removed existing installation", "-".dimmed());
    }
    println!(
        "   {} downloaded {} bytes from {}",
        "+".dimmed(),
        outcome.bytes,
        outcome.download_url.dimmed()
    );
    println!(
        "   {} extracted {} files to {}",
        "+".dimmed(),
        outcome.extracted.files,
        outcome.dest.display()
    );

    if let IndexSync::Stale(err) = &outcome.index {
        eprintln!(
            "{} could not update index: {}",
            "warning:".yellow().bold(),
            err
        );
    }

    println!(
        "{} Successfully installed {} v{}",
        "OK".green().bold(),
        outcome.entry.name,
        outcome.entry.version
    );
    Ok(())
}
