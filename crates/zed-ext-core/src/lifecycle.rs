//! Install, remove, list, and search.
//!
//! Install and remove each have one primary effect on `installed/<id>` and
//! a secondary one on `index.json`. A failed primary effect is an error; a
//! failed index update after a successful primary effect is reported as
//! [`IndexSync::Stale`] in the outcome instead.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use zed_ext_fs::{ExtensionPaths, ExtractSummary, extract_tar_gz, io::remove_dir_all_if_exists};
use zed_ext_index::{ExtensionIndex, RemovedEntries};
use zed_ext_registry::{Fetcher, RegistryClient, RegistryEntry, ReqwestTransport, Transport};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Whether the index caught up with the filesystem.
#[derive(Debug)]
pub enum IndexSync {
    Updated,
    /// The primary effect happened but the index could not be updated.
    Stale(zed_ext_index::Error),
}

impl IndexSync {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }
}

#[derive(Debug)]
pub struct InstallOutcome {
    /// The registry entry, with any version override applied.
    pub entry: RegistryEntry,
    pub dest: PathBuf,
    /// A previous installation was deleted first.
    pub replaced: bool,
    pub download_url: String,
    pub bytes: u64,
    pub extracted: ExtractSummary,
    pub index: IndexSync,
}

#[derive(Debug)]
pub struct RemoveOutcome {
    pub id: String,
    /// Index entries dropped along with the directory. Empty when the index
    /// is stale.
    pub removed: RemovedEntries,
    pub index: IndexSync,
}

/// One row of `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedExtension {
    pub id: String,
    pub name: String,
    pub version: String,
    pub dev: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub extensions: Vec<ListedExtension>,
    /// Directories under `installed/`, filled only when the index lists
    /// no extensions at all.
    pub unindexed_dirs: Vec<String>,
}

/// Entry point for every command.
pub struct Lifecycle {
    extensions_dir: Option<PathBuf>,
    registry: RegistryClient,
    fetcher: Fetcher,
}

impl Lifecycle {
    /// Build the HTTP client once and share it between the registry client
    /// and the downloader.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings.http_timeout)
            .map_err(zed_ext_registry::Error::from)?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    pub fn with_transport(settings: &Settings, transport: Arc<dyn Transport>) -> Self {
        let registry = RegistryClient::new(transport.clone(), settings.api_base.clone())
            .with_max_schema_version(settings.max_schema_version);
        let fetcher = Fetcher::new(transport, settings.retry).with_progress(settings.progress);
        Self {
            extensions_dir: settings.extensions_dir.clone(),
            registry,
            fetcher,
        }
    }

    /// Platform paths, or the configured override.
    pub fn paths(&self) -> Result<ExtensionPaths> {
        Ok(ExtensionPaths::resolve_with(self.extensions_dir.as_deref())?)
    }

    /// Look `id` up in the registry and apply a version override.
    pub fn resolve(&self, id: &str, version: Option<&str>) -> Result<RegistryEntry> {
        zed_ext_fs::validate_extension_id(id)?;
        if let Some(version) = version {
            validate_version(version)?;
        }
        let mut entry = self.registry.find_exact(id)?;
        if let Some(version) = version {
            tracing::debug!(
                id,
                registry = %entry.version,
                requested = version,
                "Overriding version"
            );
            entry.version = version.to_string();
        }
        Ok(entry)
    }

    /// Resolve and install in one step.
    pub fn install(&self, id: &str, version: Option<&str>) -> Result<InstallOutcome> {
        let paths = self.paths()?;
        let entry = self.resolve(id, version)?;
        self.install_entry(&paths, entry)
    }

    /// Download and unpack `entry` into `installed/<id>`, replacing what was
    /// there, then record it in the index.
    pub fn install_entry(
        &self,
        paths: &ExtensionPaths,
        entry: RegistryEntry,
    ) -> Result<InstallOutcome> {
        let dest = paths.extension_dir(&entry.id)?;

        let replaced = remove_dir_all_if_exists(&dest)?;
        if replaced {
            tracing::debug!(dest = %dest.display(), "Removed existing installation");
        }

        let scratch = tempfile::Builder::new()
            .prefix("zed-ext-")
            .tempdir()
            .map_err(|source| Error::Io {
                path: std::env::temp_dir(),
                source,
            })?;
        let archive = scratch.path().join(format!("{}.tar.gz", entry.id));
        let download_url = self.registry.download_url(&entry.id, &entry.version);

        let bytes = self
            .fetcher
            .fetch(&download_url, &archive)
            .map_err(|source| Error::Download {
                id: entry.id.clone(),
                source,
            })?;

        let extracted = extract_into(&archive, &dest).map_err(|source| Error::Extraction {
            id: entry.id.clone(),
            source,
        })?;
        tracing::debug!(id = %entry.id, files = extracted.files, "Extracted");

        let (_, index) = sync_index(paths, |index| index.reconcile_install(&entry.id, paths));

        Ok(InstallOutcome {
            entry,
            dest,
            replaced,
            download_url,
            bytes,
            extracted,
            index,
        })
    }

    /// Delete `installed/<id>` and drop its index entries.
    pub fn remove(&self, id: &str) -> Result<RemoveOutcome> {
        let paths = self.paths()?;
        let dest = paths.extension_dir(id)?;

        if !remove_dir_all_if_exists(&dest)? {
            return Err(Error::NotInstalled { id: id.to_string() });
        }

        let (removed, index) = sync_index(&paths, |index| Ok(index.reconcile_remove(id)));
        Ok(RemoveOutcome {
            id: id.to_string(),
            removed: removed.unwrap_or_default(),
            index,
        })
    }

    /// What the index says is installed. The index must be readable.
    pub fn list(&self) -> Result<Listing> {
        let paths = self.paths()?;
        let index = ExtensionIndex::load(&paths)?;

        let extensions: Vec<ListedExtension> = index
            .entries()
            .map(|(id, entry)| ListedExtension {
                id: id.to_string(),
                name: entry.manifest.name.clone(),
                version: entry.manifest.version.clone(),
                dev: entry.dev,
            })
            .collect();

        let unindexed_dirs = if extensions.is_empty() {
            installed_dirs(&paths.installed)
        } else {
            Vec::new()
        };

        Ok(Listing {
            extensions,
            unindexed_dirs,
        })
    }

    pub fn search(&self, query: &str) -> Result<Vec<RegistryEntry>> {
        Ok(self.registry.search(query)?)
    }
}

/// A version override must name a single path segment.
fn validate_version(version: &str) -> Result<()> {
    if matches!(version, "" | "." | "..") {
        return Err(Error::InvalidVersion {
            version: version.to_string(),
        });
    }
    Ok(())
}

/// Create `dest` and extract into it, deleting it again on failure.
fn extract_into(archive: &Path, dest: &Path) -> zed_ext_fs::Result<ExtractSummary> {
    fs::create_dir_all(dest).map_err(|e| zed_ext_fs::Error::io(dest, e))?;
    extract_tar_gz(archive, dest).inspect_err(|_| {
        if let Err(e) = fs::remove_dir_all(dest) {
            tracing::warn!(
                dest = %dest.display(),
                error = %e,
                "Could not clean up partial extraction"
            );
        }
    })
}

/// Load, update, and save the index. Failures are logged and folded into
/// [`IndexSync::Stale`].
fn sync_index<T>(
    paths: &ExtensionPaths,
    update: impl FnOnce(&mut ExtensionIndex) -> zed_ext_index::Result<T>,
) -> (Option<T>, IndexSync) {
    let result = ExtensionIndex::load(paths).and_then(|mut index| {
        let value = update(&mut index)?;
        index.save(paths)?;
        Ok(value)
    });
    match result {
        Ok(value) => (Some(value), IndexSync::Updated),
        Err(e) => {
            tracing::warn!(error = %e, "Index update failed");
            (None, IndexSync::Stale(e))
        }
    }
}

fn installed_dirs(installed: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(installed) else {
        return Vec::new();
    };
    let mut dirs: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    dirs.sort();
    dirs
}
