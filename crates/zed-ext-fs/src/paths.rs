//! Extension directory layout resolution
//!
//! Zed keeps extensions in a per-OS application data directory:
//!
//! ```text
//! <base>/
//! ├── index.json
//! └── installed/
//!     └── <extension-id>/
//!         └── extension.toml
//! ```

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Subdirectory holding one directory per installed extension.
pub const INSTALLED_DIR: &str = "installed";

/// File name of the extension index.
pub const INDEX_FILENAME: &str = "index.json";

/// Resolved locations of the extensions directory, its `installed/`
/// subdirectory, and `index.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPaths {
    pub base: PathBuf,
    pub installed: PathBuf,
    pub index: PathBuf,
}

impl ExtensionPaths {
    /// Build the layout rooted at an explicit base directory.
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            installed: base.join(INSTALLED_DIR),
            index: base.join(INDEX_FILENAME),
            base,
        }
    }

    /// Resolve the layout for the current platform and environment.
    pub fn resolve() -> Result<Self> {
        let xdg_data_home = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from);
        let base = platform_base(
            std::env::consts::OS,
            xdg_data_home.as_deref(),
            dirs::home_dir().as_deref(),
        )?;
        tracing::debug!(base = %base.display(), "Resolved extensions directory");
        Ok(Self::from_base(base))
    }

    /// Resolve the layout, preferring `base_override` when given.
    pub fn resolve_with(base_override: Option<&Path>) -> Result<Self> {
        match base_override {
            Some(base) => Ok(Self::from_base(base)),
            None => Self::resolve(),
        }
    }

    /// Installation directory for an extension.
    ///
    /// The id becomes a single path segment, so anything that could climb
    /// out of `installed/` is rejected.
    pub fn extension_dir(&self, id: &str) -> Result<PathBuf> {
        validate_extension_id(id)?;
        Ok(self.installed.join(id))
    }
}

/// Compute the extensions base directory for `os`.
///
/// Pure so every platform branch can be tested on any host.
pub fn platform_base(
    os: &str,
    xdg_data_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    match os {
        "macos" => {
            let home = home.ok_or(Error::HomeDirNotFound)?;
            Ok(home
                .join("Library")
                .join("Application Support")
                .join("Zed")
                .join("extensions"))
        }
        "linux" => {
            if let Some(data_home) = xdg_data_home.filter(|p| !p.as_os_str().is_empty()) {
                return Ok(data_home.join("zed").join("extensions"));
            }
            let home = home.ok_or(Error::HomeDirNotFound)?;
            Ok(home.join(".local").join("share").join("zed").join("extensions"))
        }
        other => Err(Error::UnsupportedPlatform {
            os: other.to_string(),
        }),
    }
}

/// Check that an extension id is usable as a single directory name.
pub fn validate_extension_id(id: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidExtensionId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if id == "." || id == ".." {
        return Err(invalid("id must not be a relative path marker"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(invalid(
            "id must contain only alphanumeric characters, hyphens, underscores, or dots",
        ));
    }
    Ok(())
}
