//! Core orchestration for zed-ext
//!
//! Ties the registry, the filesystem layer, and the index together into the
//! install and remove lifecycle.

pub mod error;
pub mod lifecycle;
pub mod settings;

pub use error::{Error, Result};
pub use lifecycle::{
    IndexSync, InstallOutcome, Lifecycle, ListedExtension, Listing, RemoveOutcome,
};
pub use settings::Settings;
