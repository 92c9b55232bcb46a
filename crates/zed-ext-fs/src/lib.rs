//! Filesystem layer for zed-ext
//!
//! Provides extension directory resolution, atomic I/O, and safe archive
//! extraction.

pub mod archive;
pub mod error;
pub mod io;
pub mod path;
pub mod paths;

pub use archive::{ExtractSummary, extract_tar_gz};
pub use error::{Error, Result};
pub use path::{EntryPath, normalize_entry_path};
pub use paths::{ExtensionPaths, validate_extension_id};
