//! Error types for zed-ext-core

use std::path::PathBuf;

/// Result type for zed-ext-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in zed-ext-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing to remove at `installed/<id>`
    #[error("extension \"{id}\" is not installed")]
    NotInstalled { id: String },

    #[error("invalid version \"{version}\"")]
    InvalidVersion { version: String },

    /// The archive downloaded but could not be unpacked
    #[error("failed to extract {id}: {source}")]
    Extraction {
        id: String,
        #[source]
        source: zed_ext_fs::Error,
    },

    #[error("failed to download {id}: {source}")]
    Download {
        id: String,
        #[source]
        source: zed_ext_registry::FetchError,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from zed-ext-fs
    #[error(transparent)]
    Fs(#[from] zed_ext_fs::Error),

    /// Registry error from zed-ext-registry
    #[error(transparent)]
    Registry(#[from] zed_ext_registry::Error),

    /// Index error from zed-ext-index
    #[error(transparent)]
    Index(#[from] zed_ext_index::Error),
}
