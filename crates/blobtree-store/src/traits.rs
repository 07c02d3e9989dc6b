use blobtree_types::Digest;

use crate::error::StoreResult;

/// Content-addressed byte store.
///
/// All implementations must satisfy these invariants:
/// - `upload` returns the digest of exactly the bytes given; uploading the
///   same bytes twice returns the same digest and is not an error.
/// - `download` returns the uploaded bytes unchanged.
/// - Operations other than `connect` fail with `StoreError::NotConnected`
///   while the store is disconnected.
/// - All transport errors are propagated, never silently ignored.
///
/// Methods take `&self` so one connected instance can be shared between
/// several overlays pointed at the same endpoint.
pub trait DigestStore: Send + Sync {
    /// Open the underlying session. Calling it on a connected store is a no-op.
    fn connect(&self) -> StoreResult<()>;

    /// Release the underlying session.
    fn disconnect(&self) -> StoreResult<()>;

    /// Returns `true` between `connect()` and `disconnect()`.
    fn is_connected(&self) -> bool;

    /// Store a payload and return its digest.
    fn upload(&self, payload: &[u8]) -> StoreResult<Digest>;

    /// Fetch the payload stored under `digest`.
    fn download(&self, digest: &Digest) -> StoreResult<Vec<u8>>;

    /// Remove the payload stored under `digest`.
    fn delete(&self, digest: &Digest) -> StoreResult<()>;
}
