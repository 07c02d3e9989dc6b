use serde::{Deserialize, Serialize};

/// Settings for the HTTP blob client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Create the BLOB table for the bucket on `connect()`.
    pub provision_table: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            provision_table: true,
        }
    }
}
