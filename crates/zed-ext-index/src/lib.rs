//! Extension manifests and the local extension index.
//!
//! This crate parses `extension.toml` manifests and keeps `index.json` in
//! step with what is installed.

pub mod error;
pub mod index;
pub mod manifest;

/// The manifest file at the root of every extension.
pub const MANIFEST_FILENAME: &str = "extension.toml";

/// Per-language configuration inside a language directory.
pub const LANGUAGE_CONFIG_FILENAME: &str = "config.toml";

pub use error::{Error, Result};
pub use index::{ExtensionEntry, ExtensionIndex, RemovedEntries, ResourceEntry};
pub use manifest::{ExtensionManifest, LanguageConfig, ManifestLib};
