//! CrateDB BLOB table client.
//!
//! CrateDB exposes BLOB tables over plain HTTP, addressed by the SHA-1 of the
//! payload:
//!
//! | Method | Path                         | Success            |
//! |--------|------------------------------|--------------------|
//! | PUT    | `/_blobs/{table}/{sha1}`     | `201`, `409` (dup) |
//! | GET    | `/_blobs/{table}/{sha1}`     | `200`              |
//! | DELETE | `/_blobs/{table}/{sha1}`     | `204`              |
//! | POST   | `/_sql` (`CREATE BLOB TABLE`) | `200`, `409` (dup) |
//!
//! The client is synchronous; callers inside an async runtime must move calls
//! onto a blocking thread.

use std::sync::RwLock;
use std::time::Duration;

use blobtree_types::{Digest, Locator};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::DigestStore;

/// Digest store backed by a CrateDB BLOB table.
pub struct CrateBlobStore {
    /// Endpoint with credentials stripped.
    base: Url,
    table: String,
    username: Option<String>,
    password: Option<String>,
    config: ClientConfig,
    client: RwLock<Option<Client>>,
}

impl CrateBlobStore {
    /// Create a disconnected client for the bucket described by `locator`.
    ///
    /// No network activity happens until [`DigestStore::connect`].
    pub fn new(locator: &Locator, config: ClientConfig) -> Self {
        let mut base = locator.endpoint().clone();
        let username = locator.username().map(str::to_string);
        let password = locator.password().map(str::to_string);
        // Both setters only fail for cannot-be-a-base URLs, which a decoded
        // locator never produces.
        let _ = base.set_username("");
        let _ = base.set_password(None);
        base.set_query(None);

        Self {
            base,
            table: locator.namespace().to_string(),
            username,
            password,
            config,
            client: RwLock::new(None),
        }
    }

    /// The BLOB table this client reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The endpoint requests are sent to, without credentials.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn blob_url(&self, digest: &Digest) -> StoreResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["_blobs", self.table.as_str(), digest.to_hex().as_str()]);
        Ok(url)
    }

    fn client(&self) -> StoreResult<Client> {
        self.client
            .read()
            .expect("lock poisoned")
            .clone()
            .ok_or(StoreError::NotConnected)
    }

    fn request(&self, client: &Client, method: Method, url: Url) -> RequestBuilder {
        let builder = client.request(method, url);
        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_ref()),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder, url: &Url) -> StoreResult<Response> {
        builder.send().map_err(|source| StoreError::Http {
            url: url.to_string(),
            source,
        })
    }

    fn provision(&self, client: &Client) -> StoreResult<()> {
        let url = self
            .base
            .join("_sql")
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        let stmt = format!(
            "CREATE BLOB TABLE \"{}\"",
            self.table.replace('"', "\"\"")
        );
        let body = serde_json::json!({ "stmt": stmt }).to_string();
        let builder = self
            .request(client, Method::POST, url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let response = self.send(builder, &url)?;

        match response.status() {
            StatusCode::OK => {
                info!(table = %self.table, "created blob table");
                Ok(())
            }
            StatusCode::CONFLICT => {
                debug!(table = %self.table, "blob table already exists");
                Ok(())
            }
            _ => Err(unexpected(&url, response)),
        }
    }
}

impl DigestStore for CrateBlobStore {
    fn connect(&self) -> StoreResult<()> {
        let mut slot = self.client.write().expect("lock poisoned");
        if slot.is_some() {
            return Ok(());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|source| StoreError::Http {
                url: self.base.to_string(),
                source,
            })?;
        if self.config.provision_table {
            self.provision(&client)?;
        }

        *slot = Some(client);
        info!(endpoint = %self.base, table = %self.table, "connected to blob store");
        Ok(())
    }

    fn disconnect(&self) -> StoreResult<()> {
        if self.client.write().expect("lock poisoned").take().is_some() {
            info!(endpoint = %self.base, table = %self.table, "disconnected from blob store");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.client.read().expect("lock poisoned").is_some()
    }

    fn upload(&self, payload: &[u8]) -> StoreResult<Digest> {
        let client = self.client()?;
        let digest = Digest::of(payload);
        let url = self.blob_url(&digest)?;
        let builder = self
            .request(&client, Method::PUT, url.clone())
            .body(payload.to_vec());
        let response = self.send(builder, &url)?;

        match response.status() {
            StatusCode::CREATED => {
                debug!(digest = %digest.short_hex(), len = payload.len(), "blob uploaded");
                Ok(digest)
            }
            StatusCode::CONFLICT => {
                debug!(digest = %digest.short_hex(), "blob already present");
                Ok(digest)
            }
            _ => Err(unexpected(&url, response)),
        }
    }

    fn download(&self, digest: &Digest) -> StoreResult<Vec<u8>> {
        let client = self.client()?;
        let url = self.blob_url(digest)?;
        let response = self.send(self.request(&client, Method::GET, url.clone()), &url)?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().map_err(|source| StoreError::Http {
                    url: url.to_string(),
                    source,
                })?;
                debug!(digest = %digest.short_hex(), len = bytes.len(), "blob downloaded");
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(*digest)),
            _ => Err(unexpected(&url, response)),
        }
    }

    fn delete(&self, digest: &Digest) -> StoreResult<()> {
        let client = self.client()?;
        let url = self.blob_url(digest)?;
        let response = self.send(self.request(&client, Method::DELETE, url.clone()), &url)?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => {
                debug!(digest = %digest.short_hex(), "blob deleted");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(*digest)),
            _ => Err(unexpected(&url, response)),
        }
    }
}

impl std::fmt::Debug for CrateBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrateBlobStore")
            .field("base", &self.base.as_str())
            .field("table", &self.table)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("connected", &self.is_connected())
            .finish()
    }
}

fn unexpected(url: &Url, response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    StoreError::Status {
        status,
        url: url.to_string(),
        body,
    }
}
