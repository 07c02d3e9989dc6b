//! Scoped digest store sessions.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::store::ObjectStore;

/// Borrow of an [`ObjectStore`] with an open digest store session.
///
/// Created by [`ObjectStore::session`]. Dropping the guard disconnects, on
/// success and on early return alike.
pub struct Session<'a> {
    store: &'a mut ObjectStore,
}

impl<'a> Session<'a> {
    pub(crate) fn new(store: &'a mut ObjectStore) -> Self {
        Self { store }
    }
}

impl Deref for Session<'_> {
    type Target = ObjectStore;

    fn deref(&self) -> &ObjectStore {
        &*self.store
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut ObjectStore {
        &mut *self.store
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.store.disconnect() {
            warn!(namespace = %self.store.namespace(), error = %e, "failed to disconnect");
        }
    }
}
