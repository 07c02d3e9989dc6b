//! Expiring cache of connected digest store clients.
//!
//! Opening a client costs a round trip (and possibly table provisioning),
//! so clients are shared per endpoint and bucket. Entries are bounded in
//! number and age: the oldest entry is evicted when the cache is full, and
//! an entry older than the time to live is replaced by a fresh connection
//! the next time it is asked for.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use blobtree_store::{ClientConfig, CrateBlobStore, DigestStore, StoreResult};
use blobtree_types::Locator;
use tracing::{debug, info};

use crate::config::CacheConfig;

/// Produces digest store clients for a decoded locator.
pub trait Connector: Send + Sync {
    /// Build a client for `locator` without opening it.
    fn build(&self, locator: &Locator) -> Arc<dyn DigestStore>;

    /// Build a client and connect it.
    fn connect(&self, locator: &Locator) -> StoreResult<Arc<dyn DigestStore>> {
        let client = self.build(locator);
        client.connect()?;
        Ok(client)
    }
}

/// Connects to CrateDB BLOB tables over HTTP.
#[derive(Clone, Debug, Default)]
pub struct HttpConnector {
    config: ClientConfig,
}

impl HttpConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Connector for HttpConnector {
    fn build(&self, locator: &Locator) -> Arc<dyn DigestStore> {
        Arc::new(CrateBlobStore::new(locator, self.config.clone()))
    }
}

struct CachedClient {
    client: Arc<dyn DigestStore>,
    opened: Instant,
}

/// Capacity- and age-bounded cache of connected clients keyed by
/// [`Locator::cache_key`].
pub struct ClientCache {
    connector: Box<dyn Connector>,
    capacity: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedClient>>,
}

impl ClientCache {
    /// Create a cache. A capacity of zero is treated as one.
    pub fn new(connector: Box<dyn Connector>, capacity: usize, ttl: Duration) -> Self {
        Self {
            connector,
            capacity: capacity.max(1),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache bounded by `config`.
    pub fn from_config(connector: Box<dyn Connector>, config: &CacheConfig) -> Self {
        Self::new(connector, config.capacity, Duration::from_secs(config.ttl_secs))
    }

    /// The connector producing this cache's clients.
    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }

    /// Return a connected client for `locator`, connecting a new one if none
    /// is cached or the cached one has outlived the time to live.
    ///
    /// The lock is held while connecting, so concurrent callers for the same
    /// bucket share one connection.
    pub fn get(&self, locator: &Locator) -> StoreResult<Arc<dyn DigestStore>> {
        let key = locator.cache_key();
        let mut entries = self.entries.lock().expect("lock poisoned");

        if let Some(entry) = entries.get(&key) {
            if entry.opened.elapsed() < self.ttl {
                return Ok(Arc::clone(&entry.client));
            }
            info!(key = %key, "cached client expired, reconnecting");
            entries.remove(&key);
        }

        let client = self.connector.connect(locator)?;

        if entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.opened)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!(key = %oldest, "evicting cached client");
                entries.remove(&oldest);
            }
        }

        debug!(key = %key, "connected client cached");
        entries.insert(
            key,
            CachedClient {
                client: Arc::clone(&client),
                opened: Instant::now(),
            },
        );
        Ok(client)
    }

    /// Drop the cached client for `locator`, if any.
    pub fn invalidate(&self, locator: &Locator) -> bool {
        self.entries
            .lock()
            .expect("lock poisoned")
            .remove(&locator.cache_key())
            .is_some()
    }

    /// Drop every cached client.
    pub fn clear(&self) {
        self.entries.lock().expect("lock poisoned").clear();
    }

    /// Number of cached clients, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    /// Returns `true` if no client is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
