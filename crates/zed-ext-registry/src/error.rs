//! Error types for zed-ext-registry

use std::path::PathBuf;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, message: impl ToString) -> Self {
        Self {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Errors from the registry API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with something other than 200.
    #[error("registry API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to read response from {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("extension '{id}' not found")]
    NotFound { id: String },
}

/// Failures of a single download attempt, and of the retry loop as a whole.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] TransportError),

    #[error("download of {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download of {url} interrupted: {source}")]
    Interrupted {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("incomplete download: expected {expected} bytes, got {actual}")]
    IncompleteDownload { expected: u64, actual: u64 },

    #[error("download of {url} failed after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}
