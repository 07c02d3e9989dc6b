//! Object store overlay for blobtree.
//!
//! [`ObjectStore`] turns a flat "put bytes, get digest" BLOB store into
//! something that behaves like a directory tree: nested paths, directory
//! listings, recursive deletion and byte-exact downloads. It owns a
//! [`PathIndex`](blobtree_index::PathIndex) for the hierarchy and a map from
//! file path to content digest; bytes themselves go to a shared
//! [`DigestStore`](blobtree_store::DigestStore).
//!
//! The path index lives in memory only. It is not persisted across process
//! restarts.

pub mod error;
pub mod session;
pub mod store;

pub use error::{OverlayError, OverlayResult};
pub use session::Session;
pub use store::ObjectStore;
