//! The `index.json` store.
//!
//! The index is loaded whole, mutated in memory, and written back
//! atomically. Theme and language entries point at the extension that
//! contributed them; the write paths here keep those references valid,
//! loading does not check them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use zed_ext_fs::ExtensionPaths;

use crate::error::{Error, Result};
use crate::manifest::{ExtensionManifest, LanguageConfig, null_as_default};
use crate::{LANGUAGE_CONFIG_FILENAME, MANIFEST_FILENAME};

const LANGUAGES_DIR: &str = "languages";
const THEMES_DIR: &str = "themes";

/// An installed extension as recorded in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionEntry {
    pub manifest: ExtensionManifest,
    #[serde(default)]
    pub dev: bool,
}

/// A theme or language and the extension that provides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub extension: String,
    /// Relative to the extension's installation directory.
    pub path: String,
}

/// In-memory form of `index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionIndex {
    #[serde(default, deserialize_with = "null_as_default")]
    pub extensions: BTreeMap<String, ExtensionEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub themes: BTreeMap<String, ResourceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon_themes: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: BTreeMap<String, ResourceEntry>,
}

/// What [`ExtensionIndex::reconcile_remove`] dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedEntries {
    /// Whether the extension itself had an entry.
    pub extension: bool,
    pub themes: Vec<String>,
    pub languages: Vec<String>,
}

impl RemovedEntries {
    pub fn is_empty(&self) -> bool {
        !self.extension && self.themes.is_empty() && self.languages.is_empty()
    }
}

impl ExtensionIndex {
    /// Load the index, treating a missing file as an empty index.
    pub fn load(paths: &ExtensionPaths) -> Result<Self> {
        match zed_ext_fs::io::read_text_optional(&paths.index)? {
            None => {
                tracing::debug!(path = %paths.index.display(), "No index yet, starting empty");
                Ok(Self::default())
            }
            Some(content) => serde_json::from_str(&content).map_err(|source| Error::IndexParse {
                path: paths.index.clone(),
                source,
            }),
        }
    }

    /// Write the index as pretty-printed JSON, atomically.
    pub fn save(&self, paths: &ExtensionPaths) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(Error::IndexSerialize)?;
        zed_ext_fs::io::write_atomic(&paths.index, content.as_bytes())?;
        tracing::debug!(path = %paths.index.display(), "Saved index");
        Ok(())
    }

    /// Record the extension installed at `installed/<id>` and register the
    /// themes and languages it provides.
    ///
    /// Entries the extension contributed previously but no longer provides
    /// are left in place; remove the extension first for a clean slate.
    pub fn reconcile_install(&mut self, id: &str, paths: &ExtensionPaths) -> Result<()> {
        let ext_dir = paths.extension_dir(id)?;
        let manifest = ExtensionManifest::from_path(&ext_dir.join(MANIFEST_FILENAME))?;

        let languages = match &manifest.languages {
            Some(declared) => declared_languages(&ext_dir, declared),
            None => {
                tracing::debug!(extension = id, "Auto-detecting languages");
                detect_languages(&ext_dir)
            }
        };
        let themes = match &manifest.themes {
            Some(declared) => declared_themes(declared),
            None => {
                tracing::debug!(extension = id, "Auto-detecting themes");
                detect_themes(&ext_dir)
            }
        };

        for (name, path) in languages {
            self.languages.insert(name, ResourceEntry::new(id, path));
        }
        for (name, path) in themes {
            self.themes.insert(name, ResourceEntry::new(id, path));
        }
        self.extensions.insert(
            id.to_string(),
            ExtensionEntry {
                manifest,
                dev: false,
            },
        );
        Ok(())
    }

    /// Drop the extension and every theme and language it owns.
    pub fn reconcile_remove(&mut self, id: &str) -> RemovedEntries {
        let extension = self.extensions.remove(id).is_some();
        RemovedEntries {
            extension,
            themes: remove_owned(&mut self.themes, id),
            languages: remove_owned(&mut self.languages, id),
        }
    }

    /// Installed extensions in ID order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ExtensionEntry)> {
        self.extensions.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

impl ResourceEntry {
    fn new(extension: &str, path: String) -> Self {
        Self {
            extension: extension.to_string(),
            path,
        }
    }
}

fn remove_owned(map: &mut BTreeMap<String, ResourceEntry>, id: &str) -> Vec<String> {
    let mut removed = Vec::new();
    map.retain(|name, entry| {
        let owned = entry.extension == id;
        if owned {
            removed.push(name.clone());
        }
        !owned
    });
    removed
}

/// `(name, path)` for each listed language directory. The name is the
/// directory's base name unless its `config.toml` says otherwise.
fn declared_languages(ext_dir: &Path, declared: &[String]) -> Vec<(String, String)> {
    declared
        .iter()
        .map(|dir| {
            let fallback = Path::new(dir)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.clone());
            let name = language_name(&ext_dir.join(dir)).unwrap_or(fallback);
            (name, dir.clone())
        })
        .collect()
}

fn detect_languages(ext_dir: &Path) -> Vec<(String, String)> {
    let languages_dir = ext_dir.join(LANGUAGES_DIR);
    sorted_children(&languages_dir, true)
        .into_iter()
        .map(|dir| {
            let name = language_name(&languages_dir.join(&dir)).unwrap_or_else(|| dir.clone());
            (name, format!("{LANGUAGES_DIR}/{dir}"))
        })
        .collect()
}

fn language_name(language_dir: &Path) -> Option<String> {
    LanguageConfig::read_name(&language_dir.join(LANGUAGE_CONFIG_FILENAME))
}

/// `(name, path)` for each listed theme file; the name drops the extension.
fn declared_themes(declared: &[String]) -> Vec<(String, String)> {
    declared
        .iter()
        .map(|path| {
            let name = Path::new(path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            (name, path.clone())
        })
        .collect()
}

fn detect_themes(ext_dir: &Path) -> Vec<(String, String)> {
    sorted_children(&ext_dir.join(THEMES_DIR), false)
        .into_iter()
        .filter_map(|file| {
            let name = file.strip_suffix(".json")?.to_string();
            Some((name, format!("{THEMES_DIR}/{file}")))
        })
        .collect()
}

/// Names of the directories (or non-directories) directly under `dir`,
/// sorted. A missing or unreadable `dir` yields nothing.
fn sorted_children(dir: &Path, directories: bool) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %dir.display(), error = %e, "Nothing to auto-detect");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_type()
                .is_ok_and(|kind| kind.is_dir() == directories)
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(extension: &str, path: &str) -> ResourceEntry {
        ResourceEntry::new(extension, path.to_string())
    }

    #[test]
    fn test_reconcile_remove_reports_owned_entries() {
        let mut index = ExtensionIndex::default();
        index.themes.insert("a-dark".into(), entry("a", "themes/a-dark.json"));
        index.themes.insert("b".into(), entry("b", "themes/b.json"));
        index.languages.insert("A".into(), entry("a", "languages/a"));

        let removed = index.reconcile_remove("a");

        assert_eq!(
            removed,
            RemovedEntries {
                extension: false,
                themes: vec!["a-dark".into()],
                languages: vec!["A".into()],
            }
        );
        assert_eq!(index.themes.len(), 1);
        assert!(index.languages.is_empty());
    }

    #[test]
    fn test_reconcile_remove_unknown_is_noop() {
        let mut index = ExtensionIndex::default();
        index.themes.insert("b".into(), entry("b", "themes/b.json"));

        assert!(index.reconcile_remove("zzz").is_empty());
        assert_eq!(index.themes.len(), 1);
    }

    #[test]
    fn test_declared_theme_names_drop_extension() {
        let themes = declared_themes(&["themes/one.json".into(), "nested/two.theme.json".into()]);
        assert_eq!(
            themes,
            vec![
                ("one".to_string(), "themes/one.json".to_string()),
                ("two.theme".to_string(), "nested/two.theme.json".to_string()),
            ]
        );
    }
}
