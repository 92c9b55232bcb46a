//! Shared test utilities for the zed-ext workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`archive`]: [`TarGzBuilder`](archive::TarGzBuilder) for building
//!   extension tarballs, including hostile ones
//! - [`extension`]: [`ExtensionFixture`](extension::ExtensionFixture) for
//!   on-disk extension contents
//! - [`layout`]: [`TestExtensionsDir`](layout::TestExtensionsDir), a
//!   throwaway extensions base directory

pub mod archive;
pub mod extension;
pub mod layout;
