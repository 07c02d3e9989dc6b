//! Error types for the overlay crate.

use blobtree_index::IndexError;
use blobtree_store::StoreError;
use blobtree_types::LocatorError;

/// Errors from object store overlay operations.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The connection descriptor could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] LocatorError),

    /// No file is stored at the path (never uploaded, or a directory).
    #[error("object not found: {0}")]
    NotFound(String),

    /// The path is empty or has an empty segment.
    #[error("invalid object path: {0:?}")]
    InvalidPath(String),

    /// The path is a directory and cannot hold content.
    #[error("path is a directory: {0}")]
    IsDirectory(String),

    /// An ancestor of the path is a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Strict lookup in the path index failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// The digest store failed; passed through unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for overlay results.
pub type OverlayResult<T> = Result<T, OverlayError>;
