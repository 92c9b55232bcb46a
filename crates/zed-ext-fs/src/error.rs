//! Error types for zed-ext-fs

use std::path::PathBuf;

/// Result type for zed-ext-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in zed-ext-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path in archive: {entry}")]
    UnsafeArchivePath { entry: PathBuf },

    #[error("Failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    #[error("cannot determine home directory")]
    HomeDirNotFound,

    #[error("invalid extension id '{id}': {reason}")]
    InvalidExtensionId { id: String, reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }

    /// Whether this error wraps an I/O "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
