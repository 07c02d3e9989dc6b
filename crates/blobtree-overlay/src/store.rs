//! The [`ObjectStore`] overlay.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use blobtree_index::{parent_path, PathIndex, PathTree, SEPARATOR};
use blobtree_store::{ClientConfig, CrateBlobStore, DigestStore, StoreError};
use blobtree_types::{Digest, EntryInfo, Locator};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{OverlayError, OverlayResult};
use crate::session::Session;

/// A directory-tree view over a content-addressed BLOB store.
///
/// Directories are synthesised from path structure: uploading `a/b/c.txt`
/// creates `a` and `a/b` implicitly, listing reports any node with children
/// as a directory, and deleting a directory removes everything below it.
///
/// The overlay assumes a single writer. Share it behind a `Mutex` when more
/// than one thread needs it.
pub struct ObjectStore {
    locator: Locator,
    blobs: Arc<dyn DigestStore>,
    /// File path to the digest of its most recent upload.
    digests: HashMap<String, Digest>,
    index: Box<dyn PathIndex>,
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("namespace", &self.locator.namespace())
            .field("endpoint", &self.locator.redacted_endpoint().as_str())
            .field("files", &self.digests.len())
            .field("nodes", &self.index.len())
            .finish()
    }
}

impl ObjectStore {
    /// Create an overlay on top of a CrateDB BLOB table.
    ///
    /// The descriptor is decoded before anything else happens, so a bad URI
    /// fails here rather than on first use. No connection is opened yet.
    pub fn open(uri: &str, config: ClientConfig) -> OverlayResult<Self> {
        let locator = Locator::parse(uri)?;
        let blobs = Arc::new(CrateBlobStore::new(&locator, config));
        Ok(Self::with_index(locator, blobs, Box::new(PathTree::new())))
    }

    /// Create an overlay for `uri` on top of an existing digest store.
    pub fn new(uri: &str, blobs: Arc<dyn DigestStore>) -> OverlayResult<Self> {
        let locator = Locator::parse(uri)?;
        Ok(Self::with_index(locator, blobs, Box::new(PathTree::new())))
    }

    /// Create an overlay from its parts.
    pub fn with_index(
        locator: Locator,
        blobs: Arc<dyn DigestStore>,
        index: Box<dyn PathIndex>,
    ) -> Self {
        Self {
            locator,
            blobs,
            digests: HashMap::new(),
            index,
        }
    }

    /// The bucket this overlay stores into.
    pub fn namespace(&self) -> &str {
        self.locator.namespace()
    }

    /// The HTTP endpoint of the digest store.
    pub fn endpoint(&self) -> &Url {
        self.locator.endpoint()
    }

    /// The decoded connection descriptor.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// The digest store receiving the bytes.
    pub fn digest_store(&self) -> &Arc<dyn DigestStore> {
        &self.blobs
    }

    /// Point the overlay at a different (typically freshly connected) client
    /// for the same bucket. The path index is kept.
    pub fn set_digest_store(&mut self, blobs: Arc<dyn DigestStore>) {
        self.blobs = blobs;
    }

    /// Forget every path. Blobs already in the digest store are left alone.
    pub fn reset(&mut self) {
        self.digests.clear();
        self.index.reset();
    }

    // ---------------------------------------------------------------
    // Connection lifecycle
    // ---------------------------------------------------------------

    /// Open the digest store session.
    pub fn connect(&self) -> OverlayResult<()> {
        self.blobs.connect()?;
        Ok(())
    }

    /// Close the digest store session.
    pub fn disconnect(&self) -> OverlayResult<()> {
        self.blobs.disconnect()?;
        Ok(())
    }

    /// Connect now and disconnect when the returned guard is dropped, even
    /// if the operations in between fail.
    pub fn session(&mut self) -> OverlayResult<Session<'_>> {
        self.connect()?;
        info!(namespace = %self.locator.namespace(), "session opened");
        Ok(Session::new(self))
    }

    // ---------------------------------------------------------------
    // File operations
    // ---------------------------------------------------------------

    /// Store `payload` at `path` and return its digest.
    ///
    /// Missing parent directories are created implicitly. Uploading to an
    /// existing file replaces its digest and size; the previous blob is not
    /// reclaimed.
    pub fn upload(&mut self, path: &str, payload: &[u8]) -> OverlayResult<Digest> {
        let path = normalize(path);
        self.check_writable(path)?;

        // Bytes first: a failed upload must not leave a file node without
        // a digest behind.
        let digest = self.blobs.upload(payload)?;

        let node = self.index.resolve_or_create(path);
        self.index.set_size(node, payload.len() as u64)?;
        self.digests.insert(path.to_string(), digest);

        debug!(path, digest = %digest.short_hex(), size = payload.len(), "uploaded");
        Ok(digest)
    }

    /// Fetch the bytes stored at `path`.
    pub fn download(&self, path: &str) -> OverlayResult<Vec<u8>> {
        let path = normalize(path);
        let digest = self
            .digests
            .get(path)
            .ok_or_else(|| OverlayError::NotFound(path.to_string()))?;

        let payload = self.blobs.download(digest)?;
        debug!(path, digest = %digest.short_hex(), size = payload.len(), "downloaded");
        Ok(payload)
    }

    /// List the direct children of the directory at `path`.
    ///
    /// Entry paths are relative to the root (`nested/c.txt`, not `c.txt`).
    /// The empty path lists the root. Entries come in insertion order; sort
    /// them when a stable order matters.
    pub fn list(&self, path: &str) -> OverlayResult<Vec<EntryInfo>> {
        let path = normalize(path);
        let children = self.index.children_of(path)?;

        Ok(children
            .into_iter()
            .map(|child| {
                let entry_path = if path.is_empty() {
                    child.name
                } else {
                    format!("{path}{SEPARATOR}{}", child.name)
                };
                EntryInfo {
                    path: entry_path,
                    is_dir: child.is_dir,
                    size: child.size,
                }
            })
            .collect())
    }

    /// Delete `path` and, if it is a directory, everything below it.
    ///
    /// The empty path deletes everything; the root itself always survives.
    /// Directories emptied by the deletion disappear as well. The index is
    /// updated before blobs are deleted, so a digest store failure part-way
    /// through leaves unreferenced blobs behind rather than dangling paths.
    pub fn delete(&mut self, path: &str) -> OverlayResult<()> {
        let path = normalize(path);
        let files = self.index.remove_subtree(path);
        let pruned = self.index.prune_empty_ancestors(path);

        let removed: Vec<(String, Digest)> = files
            .into_iter()
            .filter_map(|file| {
                let digest = self.digests.remove(&file)?;
                Some((file, digest))
            })
            .collect();

        // Files with identical bytes share one blob.
        let mut seen = HashSet::new();
        let doomed: Vec<(String, Digest)> = removed
            .iter()
            .filter(|(_, digest)| seen.insert(*digest))
            .cloned()
            .collect();

        debug!(
            path,
            files = removed.len(),
            blobs = doomed.len(),
            pruned = pruned.len(),
            "deleting"
        );
        for (file, digest) in doomed {
            match self.blobs.delete(&digest) {
                Ok(()) => debug!(path = %file, digest = %digest.short_hex(), "deleted"),
                Err(StoreError::NotFound(_)) => {
                    warn!(path = %file, digest = %digest.short_hex(), "blob already gone")
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The digest recorded for the file at `path`.
    pub fn digest_of(&self, path: &str) -> Option<Digest> {
        self.digests.get(normalize(path)).copied()
    }

    /// Returns `true` if a file is stored at `path`.
    pub fn is_file(&self, path: &str) -> bool {
        self.digests.contains_key(normalize(path))
    }

    /// Returns `true` if `path` is the root or a directory.
    pub fn is_dir(&self, path: &str) -> bool {
        let path = normalize(path);
        path.is_empty()
            || self
                .index
                .resolve(path)
                .ok()
                .and_then(|id| self.index.node(id))
                .is_some_and(|node| node.is_dir())
    }

    /// Every known file or directory path starting with `prefix`.
    ///
    /// This is a raw string match: `a` finds `ab` as well as `a/b`.
    pub fn search(&self, prefix: &str) -> Vec<String> {
        self.index
            .keys_with_prefix(prefix)
            .into_iter()
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.digests.len()
    }

    fn check_writable(&self, path: &str) -> OverlayResult<()> {
        if path.is_empty() || path.split(SEPARATOR).any(str::is_empty) {
            return Err(OverlayError::InvalidPath(path.to_string()));
        }
        if self.is_dir(path) {
            return Err(OverlayError::IsDirectory(path.to_string()));
        }

        let mut ancestor = parent_path(path);
        while let Some(dir) = ancestor.filter(|dir| !dir.is_empty()) {
            if self.digests.contains_key(dir) {
                return Err(OverlayError::NotADirectory(dir.to_string()));
            }
            ancestor = parent_path(dir);
        }
        Ok(())
    }
}

/// Strip leading and trailing separators.
fn normalize(path: &str) -> &str {
    path.trim_matches(SEPARATOR)
}
