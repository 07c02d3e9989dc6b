//! In-memory connector shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use blobtree_store::{DigestStore, InMemoryDigestStore, StoreError, StoreResult};
use blobtree_types::{Digest, Locator};

use crate::cache::Connector;

/// Hands out a fresh client per connection, all backed by one in-memory
/// store, the way separate HTTP clients all reach the same server.
#[derive(Clone, Default)]
pub(crate) struct MemoryConnector {
    backend: Arc<InMemoryDigestStore>,
    connections: Arc<AtomicUsize>,
    fail_next: Arc<AtomicBool>,
}

impl MemoryConnector {
    pub(crate) fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryDigestStore::connected()),
            ..Self::default()
        }
    }

    pub(crate) fn backend(&self) -> &InMemoryDigestStore {
        &self.backend
    }

    pub(crate) fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Connector for MemoryConnector {
    fn build(&self, _locator: &Locator) -> Arc<dyn DigestStore> {
        Arc::new(MemoryClient {
            backend: Arc::clone(&self.backend),
            connected: AtomicBool::new(false),
        })
    }

    fn connect(&self, locator: &Locator) -> StoreResult<Arc<dyn DigestStore>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::NotConnected);
        }
        let client = self.build(locator);
        client.connect()?;
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(client)
    }
}

struct MemoryClient {
    backend: Arc<InMemoryDigestStore>,
    connected: AtomicBool,
}

impl MemoryClient {
    fn ensure_connected(&self) -> StoreResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

impl DigestStore for MemoryClient {
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
        self.backend.upload(payload)
    }

    fn download(&self, digest: &Digest) -> StoreResult<Vec<u8>> {
        self.ensure_connected()?;
        self.backend.download(digest)
    }

    fn delete(&self, digest: &Digest) -> StoreResult<()> {
        self.ensure_connected()?;
        self.backend.delete(digest)
    }
}
