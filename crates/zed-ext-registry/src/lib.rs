//! Registry access for zed-ext
//!
//! A [`RegistryClient`] looks extensions up and a [`Fetcher`] downloads
//! their archives. Both go through one shared [`Transport`].

pub mod client;
pub mod error;
pub mod fetch;
pub mod transport;

pub use client::{DEFAULT_API_BASE, DEFAULT_MAX_SCHEMA_VERSION, RegistryClient, RegistryEntry};
pub use error::{Error, FetchError, Result, TransportError};
pub use fetch::{Fetcher, RetryPolicy};
pub use transport::{DEFAULT_TIMEOUT, HttpResponse, ReqwestTransport, Transport};
