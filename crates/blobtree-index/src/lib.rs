//! Path tree index for blobtree.
//!
//! Maintains the logical directory hierarchy that the object store overlay
//! lays over a flat BLOB store. Directories are never declared: a node is a
//! directory exactly when it has children, and writing `a/b/c` implies
//! `a` and `a/b`.
//!
//! # Key Types
//!
//! - [`PathIndex`] -- The index interface the overlay programs against
//! - [`PathTree`] -- In-memory arena implementation
//! - [`Node`] -- One file or directory in the hierarchy
//! - [`ChildEntry`] -- One row of a child enumeration

pub mod error;
pub mod node;
pub mod traits;
pub mod tree;

pub use error::{IndexError, IndexResult};
pub use node::{ChildEntry, Node, NodeId};
pub use traits::PathIndex;
pub use tree::PathTree;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// The parent path of `path`, or `None` for the root.
///
/// ```
/// use blobtree_index::parent_path;
///
/// assert_eq!(parent_path("a/b/c"), Some("a/b"));
/// assert_eq!(parent_path("a"), Some(""));
/// assert_eq!(parent_path(""), None);
/// ```
pub fn parent_path(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(path.rsplit_once(SEPARATOR).map_or("", |(parent, _)| parent))
}

/// Returns `true` if `key` is `scope` itself or lies below it.
///
/// Matching respects segment boundaries: `ab` is not below `a`. The empty
/// scope contains everything.
pub fn is_within(key: &str, scope: &str) -> bool {
    if scope.is_empty() || key == scope {
        return true;
    }
    key.strip_prefix(scope)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
}
