//! Remove command

use colored::Colorize;
use zed_ext_core::{IndexSync, Lifecycle};

use crate::error::Result;

/// Run the remove command
pub fn run_remove(lifecycle: &Lifecycle, id: &str) -> Result<()> {
    println!("{} Removing extension {}...", "=>".blue().bold(), id.cyan());
    let outcome = lifecycle.remove(id)?;

    for theme in &outcome.removed.themes {
        println!("   {} theme {}", "-".dimmed(), theme);
    }
    for language in &outcome.removed.languages {
        println!("   {} language {}", "-".dimmed(), language);
    }

    if let IndexSync::Stale(err) = &outcome.index {
        eprintln!(
            "{} could not update index: {}",
            "warning:".yellow().bold(),
            err
        );
    }

    println!("{} Successfully removed {}", "OK".green().bold(), outcome.id);
    Ok(())
}
