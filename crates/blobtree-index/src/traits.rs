use crate::error::IndexResult;
use crate::node::{ChildEntry, Node, NodeId};

/// The directory-tree index behind the object store overlay.
///
/// Paths are segments joined by `/` without a leading separator; the empty
/// string is the root. Implementations must keep exactly one index entry per
/// reachable node, and the root must always be present.
///
/// [`PathTree`](crate::PathTree) is the in-memory implementation. A durable
/// backing only has to implement this trait to slot in under the overlay.
pub trait PathIndex: Send {
    /// Walk `path` from the root, creating any missing node on the way.
    fn resolve_or_create(&mut self, path: &str) -> NodeId;

    /// Look up `path` without creating anything.
    fn resolve(&self, path: &str) -> IndexResult<NodeId>;

    /// Borrow a live node.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Record the byte length of a file node.
    fn set_size(&mut self, id: NodeId, size: u64) -> IndexResult<()>;

    /// Enumerate the direct children of the node at `path`.
    fn children_of(&self, path: &str) -> IndexResult<Vec<ChildEntry>>;

    /// Every indexed path that starts with `prefix` as a raw string.
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;

    /// `path` itself and every indexed path below it, segment-aware.
    fn keys_under(&self, path: &str) -> Vec<String>;

    /// Remove `path` and everything below it, except the root.
    ///
    /// Returns the full paths of the removed file nodes so that the caller
    /// can release whatever they referenced.
    fn remove_subtree(&mut self, path: &str) -> Vec<String>;

    /// Remove the ancestors of `path` that have been left without children,
    /// stopping at the first non-empty one or the root. Returns the removed
    /// directory paths.
    fn prune_empty_ancestors(&mut self, path: &str) -> Vec<String>;

    /// Returns `true` if `path` is indexed.
    fn contains(&self, path: &str) -> bool;

    /// Number of nodes, not counting the root.
    fn len(&self) -> usize;

    /// Returns `true` if only the root is left.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every node except a fresh root.
    fn reset(&mut self);
}
