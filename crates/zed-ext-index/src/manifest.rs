//! Extension manifest parsing for `extension.toml` files.
//!
//! The manifest ships inside every extension archive and declares its
//! identity and the resources it contributes. It is read as TOML and
//! stored in `index.json` as JSON.
//!
//! # Example TOML
//!
//! ```toml
//! id = "foo"
//! name = "Foo"
//! version = "1.0.0"
//! schema_version = 1
//! authors = ["Jane <jane@example.com>"]
//! repository = "https://github.com/example/foo"
//! languages = ["languages/foo"]
//!
//! [lib]
//! kind = "Rust"
//! version = "0.1.0"
//!
//! [grammars.foo]
//! repository = "https://github.com/example/tree-sitter-foo"
//! rev = "abc123"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Complete extension manifest loaded from `extension.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtensionManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repository: String,
    /// Native library binding, if the extension ships one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<ManifestLib>,
    /// Theme files. `None` means undeclared and triggers auto-detection;
    /// an empty list declares no themes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_themes: Option<Vec<String>>,
    /// Language directories, with the same `None` rule as `themes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    /// Grammar sources. Kept verbatim.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub grammars: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManifestLib {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// The part of a language's `config.toml` the index cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageConfig {
    #[serde(default)]
    pub name: String,
}

impl ExtensionManifest {
    /// Parse an extension manifest from a TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse an extension manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = zed_ext_fs::io::read_text(path).map_err(|e| {
            if e.is_not_found() {
                Error::ManifestNotFound(path.to_path_buf())
            } else {
                Error::Fs(e)
            }
        })?;
        Self::from_toml(&content).map_err(|source| Error::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl LanguageConfig {
    /// The declared language name, or `None` when the file is missing,
    /// unparsable, or names nothing.
    pub fn read_name(path: &Path) -> Option<String> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str::<LanguageConfig>(&content) {
            Ok(config) if !config.name.is_empty() => Some(config.name),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unparsable language config"
                );
                None
            }
        }
    }
}

/// Deserialize `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
