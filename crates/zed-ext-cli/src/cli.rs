//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use zed_ext_core::Settings;
use zed_ext_registry::DEFAULT_API_BASE;

/// Install, remove, list, and search Zed editor extensions
#[derive(Parser, Debug)]
#[command(name = "zed-ext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry API base URL
    #[arg(long, global = true, env = "ZED_EXT_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Extensions directory (defaults to Zed's platform location)
    #[arg(long, global = true, env = "ZED_EXT_DIR")]
    pub extensions_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "ZED_EXT_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Do not draw a download progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install an extension from the registry
    ///
    /// Any existing installation is replaced.
    ///
    /// Examples:
    ///   zed-ext install html          # Latest published version
    ///   zed-ext install html 0.1.2    # A specific version
    Install {
        /// Extension ID (exact match)
        id: String,

        /// Version to install instead of the registry's latest
        version: Option<String>,
    },

    /// Remove an installed extension
    Remove {
        /// Extension ID
        id: String,
    },

    /// List installed extensions
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Search the registry
    Search {
        /// Search text
        query: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            api_base: self.api_base.clone(),
            extensions_dir: self.extensions_dir.clone(),
            http_timeout: Duration::from_secs(self.timeout),
            progress: !self.no_progress,
            ..Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_with_version() {
        let cli = Cli::parse_from(["zed-ext", "install", "html", "0.1.2"]);
        assert_eq!(
            cli.command,
            Commands::Install {
                id: "html".into(),
                version: Some("0.1.2".into()),
            }
        );
    }

    #[test]
    fn parse_install_without_version() {
        let cli = Cli::parse_from(["zed-ext", "install", "html"]);
        assert!(matches!(cli.command, Commands::Install { version: None, .. }));
    }

    #[test]
    fn install_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["zed-ext", "install", "a", "1", "extra"]).is_err());
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["zed-ext"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "zed-ext",
            "list",
            "--json",
            "-v",
            "--extensions-dir",
            "/tmp/ext",
            "--timeout",
            "5",
            "--no-progress",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::List { json: true });

        let settings = cli.settings();
        assert_eq!(settings.extensions_dir, Some(PathBuf::from("/tmp/ext")));
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
        assert!(!settings.progress);
    }

    #[test]
    fn parse_search_json() {
        let cli = Cli::parse_from(["zed-ext", "search", "theme", "--json"]);
        assert_eq!(
            cli.command,
            Commands::Search {
                query: "theme".into(),
                json: true,
            }
        );
    }
}
