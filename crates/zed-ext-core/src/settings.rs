//! Runtime settings shared by every command.

use std::path::PathBuf;
use std::time::Duration;

use zed_ext_registry::{DEFAULT_API_BASE, DEFAULT_MAX_SCHEMA_VERSION, DEFAULT_TIMEOUT, RetryPolicy};

/// Knobs for one invocation. The CLI fills these from flags and the
/// environment; everything else uses [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub max_schema_version: u32,
    /// Use this directory instead of the platform's extensions directory.
    pub extensions_dir: Option<PathBuf>,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
    /// Draw a download progress bar.
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            max_schema_version: DEFAULT_MAX_SCHEMA_VERSION,
            extensions_dir: None,
            http_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_registry() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "https://api.zed.dev");
        assert_eq!(settings.max_schema_version, 1);
        assert_eq!(settings.http_timeout, Duration::from_secs(30));
        assert_eq!(settings.retry.attempts(), 6);
        assert!(settings.extensions_dir.is_none());
    }
}
