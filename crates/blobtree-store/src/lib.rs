//! Content-addressed digest stores for blobtree.
//!
//! A digest store is a flat key-value byte store: payloads go in, a content
//! digest comes out, and the digest is the only handle for reading or
//! deleting the payload again. The store has no notion of paths or
//! directories; those are layered on top by `blobtree-overlay`.
//!
//! # Storage Backends
//!
//! All backends implement the [`DigestStore`] trait:
//!
//! - [`InMemoryDigestStore`] -- `HashMap`-based store for tests and embedding
//! - [`CrateBlobStore`] -- CrateDB BLOB table reached over HTTP
//!
//! # Design Rules
//!
//! 1. Payloads are immutable once written; the digest is derived from them.
//! 2. Uploading a payload that is already present is not an error.
//! 3. The store never interprets payload contents.
//! 4. Transport errors are propagated unchanged; nothing is retried here.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use config::ClientConfig;
pub use error::{StoreError, StoreResult};
pub use http::CrateBlobStore;
pub use memory::InMemoryDigestStore;
pub use traits::DigestStore;
