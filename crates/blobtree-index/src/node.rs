//! Node types for the path hierarchy.

use serde::{Deserialize, Serialize};

/// Stable handle to a node in a [`PathTree`](crate::PathTree) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The raw arena slot.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single file or directory in the logical hierarchy.
///
/// A node with no children is a file; a node with children is a directory.
/// `size` is only ever set on files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The path segment this node represents (not the full path).
    pub name: String,
    /// The owning directory; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in insertion order.
    pub children: Vec<NodeId>,
    /// Byte length of the file content.
    pub size: Option<u64>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            size: None,
        }
    }

    /// Directory-ness is derived from structure, not from a type tag.
    pub fn is_dir(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One direct child of a node, as reported by `children_of`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChildEntry {
    pub name: String,
    pub is_dir: bool,
    /// `None` for directories.
    pub size: Option<u64>,
}
