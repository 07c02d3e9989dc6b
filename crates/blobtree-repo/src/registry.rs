//! Scheme-based lookup of artifact repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use blobtree_overlay::ObjectStore;
use blobtree_types::{Locator, SCHEME};
use tracing::debug;

use crate::cache::{ClientCache, Connector, HttpConnector};
use crate::config::RepoConfig;
use crate::error::{RepoError, RepoResult};
use crate::repository::ArtifactRepository;

/// Hands out [`ArtifactRepository`] instances for artifact URIs.
///
/// Only the `crate` scheme is served. Repositories for the same URI share
/// one overlay, so paths logged through one are visible through the next.
pub struct ArtifactRegistry {
    cache: Arc<ClientCache>,
    stores: Mutex<HashMap<String, Arc<Mutex<ObjectStore>>>>,
}

impl ArtifactRegistry {
    /// Create a registry that connects over HTTP.
    pub fn new(config: &RepoConfig) -> Self {
        let connector = HttpConnector::new(config.client.clone());
        Self::with_connector(Box::new(connector), config)
    }

    /// Create a registry whose clients come from `connector`.
    pub fn with_connector(connector: Box<dyn Connector>, config: &RepoConfig) -> Self {
        Self {
            cache: Arc::new(ClientCache::from_config(connector, &config.cache)),
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// The schemes this registry serves.
    pub fn schemes(&self) -> &'static [&'static str] {
        &[SCHEME]
    }

    /// The shared client cache.
    pub fn cache(&self) -> &Arc<ClientCache> {
        &self.cache
    }

    /// Return a repository for `uri`.
    pub fn get_repository(&self, uri: &str) -> RepoResult<ArtifactRepository> {
        let scheme = uri.split_once("://").map_or("", |(scheme, _)| scheme);
        if !self.schemes().contains(&scheme) {
            return Err(RepoError::UnsupportedScheme(scheme.to_string()));
        }

        let store = {
            let mut stores = self.stores.lock().expect("lock poisoned");
            match stores.get(uri) {
                Some(store) => Arc::clone(store),
                None => {
                    let locator = Locator::parse(uri)?;
                    let blobs = self.cache.connector().build(&locator);
                    let store = Arc::new(Mutex::new(ObjectStore::new(uri, blobs)?));
                    debug!(namespace = %locator.namespace(), "overlay created");
                    stores.insert(uri.to_string(), Arc::clone(&store));
                    store
                }
            }
        };

        ArtifactRepository::new(uri, store, Arc::clone(&self.cache))
    }
}

impl std::fmt::Debug for ArtifactRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactRegistry")
            .field("schemes", &self.schemes())
            .field("cache", &self.cache)
            .finish()
    }
}
