use std::path::PathBuf;

/// Errors that can occur while reading manifests or maintaining the index.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `extension.toml` is missing from an installed extension.
    #[error("extension manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// Failed to parse extension manifest TOML.
    #[error("failed to parse extension manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// `index.json` exists but is not a valid index.
    #[error("failed to parse index {path}: {source}")]
    IndexParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize the index.
    #[error("failed to serialize index: {0}")]
    IndexSerialize(#[source] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] zed_ext_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
