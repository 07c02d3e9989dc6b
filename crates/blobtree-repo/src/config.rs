use std::path::Path;

use blobtree_store::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::RepoResult;

/// Top-level settings for an artifact registry.
///
/// ```toml
/// [client]
/// timeout_secs = 10
///
/// [cache]
/// capacity = 16
/// ttl_secs = 60
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub client: ClientConfig,
    pub cache: CacheConfig,
}

impl RepoConfig {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> RepoResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RepoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Bounds for the connected-client cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached clients.
    pub capacity: usize,
    /// Seconds before a cached client is replaced by a fresh connection.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            ttl_secs: 300,
        }
    }
}
