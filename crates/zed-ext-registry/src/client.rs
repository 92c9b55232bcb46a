//! Client for the extension registry API.

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::transport::Transport;

pub const DEFAULT_API_BASE: &str = "https://api.zed.dev";

/// Highest extension schema the installer understands.
pub const DEFAULT_MAX_SCHEMA_VERSION: u32 = 1;

/// One extension as described by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repository: String,
    #[serde(default)]
    pub schema_version: Option<i32>,
    #[serde(default)]
    pub wasm_api_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub provides: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(default)]
    pub download_count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<RegistryEntry>,
}

/// Queries the registry. Holds no global state beyond the shared transport.
pub struct RegistryClient {
    transport: Arc<dyn Transport>,
    api_base: String,
    max_schema_version: u32,
}

impl RegistryClient {
    pub fn new(transport: Arc<dyn Transport>, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            transport,
            api_base,
            max_schema_version: DEFAULT_MAX_SCHEMA_VERSION,
        }
    }

    pub fn with_max_schema_version(mut self, version: u32) -> Self {
        self.max_schema_version = version;
        self
    }

    /// Fuzzy search. The registry decides what matches.
    pub fn search(&self, query: &str) -> Result<Vec<RegistryEntry>> {
        let url = format!(
            "{}/extensions?filter={}&max_schema_version={}",
            self.api_base,
            urlencoding::encode(query),
            self.max_schema_version
        );

        let response = self.transport.get(&url)?;
        let mut body = String::new();
        let mut reader = response.body;
        reader
            .read_to_string(&mut body)
            .map_err(|source| Error::Read {
                url: url.clone(),
                source,
            })?;

        if response.status != 200 {
            return Err(Error::Api {
                status: response.status,
                body,
            });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|source| Error::Decode { url, source })?;
        tracing::debug!(query, results = parsed.data.len(), "Registry search");
        Ok(parsed.data)
    }

    /// The entry whose ID is exactly `id`.
    ///
    /// Search results that merely resemble `id` do not count.
    pub fn find_exact(&self, id: &str) -> Result<RegistryEntry> {
        self.search(id)?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Archive location for `id` at `version`. Both go into the path as
    /// single encoded segments.
    pub fn download_url(&self, id: &str, version: &str) -> String {
        format!(
            "{}/extensions/{}/{}/download",
            self.api_base,
            urlencoding::encode(id),
            urlencoding::encode(version)
        )
    }
}

/// Registry records may carry `null` where a value is optional.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
