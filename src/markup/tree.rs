//! Markup tree: slotmap arena, nesting, walks, selector lookup.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{MarkupNode, NodeId};
use crate::syntax::Selector;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// An emitted markup tree, backed by a slotmap arena.
///
/// Nodes live in a single `SlotMap`; parent/child links are stored in
/// secondary maps. A tree may have several roots, kept in insertion order.
/// Equality is structural: two trees are equal when their roots match
/// pairwise, recursively, regardless of arena keys.
#[derive(Debug, Clone, Default)]
pub struct MarkupTree {
    nodes: SlotMap<NodeId, MarkupNode>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    roots: Vec<NodeId>,
}

impl MarkupTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a top-level node.
    pub fn insert_root(&mut self, data: MarkupNode) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.roots.push(id);
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: MarkupNode) -> NodeId {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        id
    }

    /// Top-level nodes, in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&MarkupNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut MarkupNode> {
        self.nodes.get_mut(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node. Empty if the node has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Pre-order traversal of the whole tree, roots in order.
    pub fn walk(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|&root| self.walk_depth_first(root))
            .collect()
    }

    /// The child of `parent` (or root, when `parent` is `None`) named `name`.
    pub fn find_child(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        let candidates = match parent {
            Some(id) => self.children(id),
            None => self.roots.as_slice(),
        };
        candidates
            .iter()
            .copied()
            .find(|&id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// The node addressed by `selector`, scope by scope from the roots.
    pub fn find(&self, selector: &Selector) -> Option<NodeId> {
        selector
            .scopes()
            .iter()
            .try_fold(None, |parent, scope| self.find_child(parent, scope).map(Some))
            .flatten()
    }

    /// The selector addressing `id`.
    pub fn selector_of(&self, id: NodeId) -> Option<Selector> {
        let mut scopes = Vec::new();
        for node in std::iter::once(id).chain(self.ancestors(id)) {
            scopes.push(self.nodes.get(node)?.name.clone());
        }
        scopes.reverse();
        Some(Selector::from_scopes(scopes))
    }

    fn subtree_eq(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let (Some(left), Some(right)) = (self.get(a), other.get(b)) else {
            return false;
        };
        let (left_kids, right_kids) = (self.children(a), other.children(b));
        left == right
            && left_kids.len() == right_kids.len()
            && left_kids
                .iter()
                .zip(right_kids)
                .all(|(&x, &y)| self.subtree_eq(x, other, y))
    }
}

impl PartialEq for MarkupTree {
    fn eq(&self, other: &Self) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(&a, &b)| self.subtree_eq(a, other, b))
    }
}

impl Eq for MarkupTree {}
