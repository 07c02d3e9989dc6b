//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    /// A strict lookup found no node at the path.
    #[error("path not found in index: {0}")]
    PathNotFound(String),

    /// A node handle no longer refers to a live node.
    #[error("stale node handle: {0}")]
    StaleNode(usize),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
