use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use blobtree_types::Digest;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::DigestStore;

/// In-memory, HashMap-based digest store.
///
/// Intended for tests and embedding. Payloads are held behind a `RwLock` and
/// cloned on read. The connected flag mimics a real session so that callers
/// exercising connect/disconnect see the same failures as with a remote store.
pub struct InMemoryDigestStore {
    blobs: RwLock<HashMap<Digest, Vec<u8>>>,
    connected: AtomicBool,
}

impl InMemoryDigestStore {
    /// Create a new empty, disconnected store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            connected: AtomicBool::new(false),
        }
    }

    /// Create a new empty store that is already connected.
    pub fn connected() -> Self {
        let store = Self::new();
        store.connected.store(true, Ordering::SeqCst);
        store
    }

    /// Number of payloads currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Returns `true` if a payload is stored under `digest`.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.blobs.read().expect("lock poisoned").contains_key(digest)
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

impl Default for InMemoryDigestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestStore for InMemoryDigestStore {
    fn connect(&self) -> StoreResult<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) -> StoreResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn upload(&self, payload: &[u8]) -> StoreResult<Digest> {
        self.ensure_connected()?;
        let digest = Digest::of(payload);
        let mut map = self.blobs.write().expect("lock poisoned");
        map.entry(digest).or_insert_with(|| payload.to_vec());
        debug!(digest = %digest.short_hex(), len = payload.len(), "blob stored");
        Ok(digest)
    }

    fn download(&self, digest: &Digest) -> StoreResult<Vec<u8>> {
        self.ensure_connected()?;
        let map = self.blobs.read().expect("lock poisoned");
        map.get(digest)
            .cloned()
            .ok_or(StoreError::NotFound(*digest))
    }

    fn delete(&self, digest: &Digest) -> StoreResult<()> {
        self.ensure_connected()?;
        let mut map = self.blobs.write().expect("lock poisoned");
        map.remove(digest)
            .map(|_| ())
            .ok_or(StoreError::NotFound(*digest))
    }
}

impl std::fmt::Debug for InMemoryDigestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDigestStore")
            .field("blob_count", &self.len())
            .field("connected", &self.is_connected())
            .finish()
    }
}
