//! In-memory arena implementation of [`PathIndex`].
//!
//! Nodes live in a `Vec` of slots addressed by [`NodeId`]; a node refers to
//! its parent by id rather than by pointer, so the tree has a single owner
//! and no reference cycles. Removed slots go on a free list and are reused.
//! Full paths map to ids through a `BTreeMap`, which keeps prefix scans
//! ordered and cheap.

use std::collections::BTreeMap;
use std::ops::Bound;

use tracing::debug;

use crate::error::{IndexError, IndexResult};
use crate::node::{ChildEntry, Node, NodeId};
use crate::traits::PathIndex;
use crate::{is_within, parent_path, SEPARATOR};

const ROOT: NodeId = NodeId(0);

/// The in-memory path tree.
pub struct PathTree {
    /// Arena slots; `None` marks a freed slot.
    nodes: Vec<Option<Node>>,
    /// Freed slots available for reuse.
    free: Vec<usize>,
    /// Full path to node id. The root is registered under `""`.
    paths: BTreeMap<String, NodeId>,
}

impl std::fmt::Debug for PathTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathTree")
            .field("nodes", &self.paths.len())
            .field("free_slots", &self.free.len())
            .finish()
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        let mut paths = BTreeMap::new();
        paths.insert(String::new(), ROOT);
        Self {
            nodes: vec![Some(Node::new("", None))],
            free: Vec::new(),
            paths,
        }
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Unregister `path`, detach its node from the parent and free the slot.
    fn unlink(&mut self, path: &str) -> Option<Node> {
        let id = self.paths.remove(path)?;
        let node = self.nodes.get_mut(id.0).and_then(Option::take)?;
        if let Some(parent) = node.parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
        self.free.push(id.0);
        Some(node)
    }
}

impl PathIndex for PathTree {
    fn resolve_or_create(&mut self, path: &str) -> NodeId {
        if let Some(&id) = self.paths.get(path) {
            return id;
        }

        // Each write implies `mkdir -p $(dirname path)`.
        let mut current = ROOT;
        let mut full = String::with_capacity(path.len());
        for (i, segment) in path.split(SEPARATOR).enumerate() {
            if i > 0 {
                full.push(SEPARATOR);
            }
            full.push_str(segment);

            current = match self.paths.get(&full) {
                Some(&id) => id,
                None => {
                    let id = self.alloc(Node::new(segment, Some(current)));
                    if let Some(parent) = self.node_mut(current) {
                        parent.children.push(id);
                    }
                    self.paths.insert(full.clone(), id);
                    debug!(path = %full, "created node");
                    id
                }
            };
        }
        current
    }

    fn resolve(&self, path: &str) -> IndexResult<NodeId> {
        self.paths
            .get(path)
            .copied()
            .ok_or_else(|| IndexError::PathNotFound(path.to_string()))
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn set_size(&mut self, id: NodeId, size: u64) -> IndexResult<()> {
        let node = self.node_mut(id).ok_or(IndexError::StaleNode(id.0))?;
        node.size = Some(size);
        Ok(())
    }

    fn children_of(&self, path: &str) -> IndexResult<Vec<ChildEntry>> {
        let id = self.resolve(path)?;
        let node = self.node(id).ok_or(IndexError::StaleNode(id.0))?;

        Ok(node
            .children
            .iter()
            .filter_map(|child| self.node(*child))
            .map(|child| {
                let is_dir = child.is_dir();
                ChildEntry {
                    name: child.name.clone(),
                    is_dir,
                    size: if is_dir { None } else { child.size },
                }
            })
            .collect())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.paths
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn keys_under(&self, path: &str) -> Vec<String> {
        self.keys_with_prefix(path)
            .into_iter()
            .filter(|key| is_within(key, path))
            .collect()
    }

    fn remove_subtree(&mut self, path: &str) -> Vec<String> {
        // Classify before unlinking anything: a directory stops looking like
        // one as soon as its children are detached.
        let doomed: Vec<(String, bool)> = self
            .keys_under(path)
            .into_iter()
            .filter_map(|key| {
                let id = self.paths.get(&key).copied()?;
                if id == ROOT {
                    return None;
                }
                let is_file = self.node(id).is_some_and(|node| !node.is_dir());
                Some((key, is_file))
            })
            .collect();

        let mut files = Vec::new();
        for (key, is_file) in doomed {
            if self.unlink(&key).is_some() && is_file {
                files.push(key);
            }
        }
        debug!(path, files = files.len(), "removed subtree");
        files
    }

    fn prune_empty_ancestors(&mut self, path: &str) -> Vec<String> {
        let mut pruned = Vec::new();
        let mut current = parent_path(path).map(str::to_string);

        while let Some(dir) = current {
            if dir.is_empty() {
                break;
            }
            let empty = self
                .paths
                .get(&dir)
                .and_then(|id| self.node(*id))
                .is_some_and(|node| node.children.is_empty());
            if !empty {
                break;
            }
            self.unlink(&dir);
            current = parent_path(&dir).map(str::to_string);
            pruned.push(dir);
        }
        pruned
    }

    fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    fn len(&self) -> usize {
        self.paths.len() - 1
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
