//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. The whole arena
//! is dropped together, so a tree never outlives the decision it served.

use std::fmt::{Debug, Write};
use std::hash::Hash;

use super::node::{MCTSNode, NodeId};

/// Arena-based MCTS tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// Parent links are plain indices, so there are no ownership cycles and
/// backpropagation is an iterative walk with bounded stack use.
#[derive(Clone, Debug)]
pub struct MCTSTree<A> {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode<A>>,

    /// The root node ID (always 0).
    root: NodeId,

    /// UCB1 exploration constant shared by every node.
    exploration: f64,
}

impl<A: Clone + Eq + Hash> MCTSTree<A> {
    /// Create a new tree with a root node.
    pub fn new(exploration: f64) -> Self {
        Self::with_capacity(exploration, 256)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(exploration: f64, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root());
        Self {
            nodes,
            root: NodeId::new(0),
            exploration,
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Exploration constant shared by the tree.
    #[inline]
    #[must_use]
    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<A> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<A> {
        &mut self.nodes[id.0 as usize]
    }

    /// Create a child of `parent` keyed by `action`, returning its ID.
    ///
    /// If the action already has a child, that child is returned unchanged.
    pub fn alloc_child(&mut self, parent: NodeId, action: A) -> NodeId {
        if let Some(existing) = self.get(parent).child(&action) {
            return existing;
        }

        let depth = self.get(parent).depth.saturating_add(1);
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MCTSNode::new(action.clone(), parent, depth));
        self.get_mut(parent).children.insert(action, id);
        id
    }

    /// Record `result` at `leaf` and every ancestor up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, result: f64) {
        let mut current = leaf;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.results.push(result);
            current = node.parent;
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<A> {
        self.get(self.root)
    }

    /// Clear the tree and reset with a fresh root.
    pub fn reset(&mut self, exploration: f64) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root());
        self.root = NodeId::new(0);
        self.exploration = exploration;
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<A>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let leaf_count = self.nodes.iter().filter(|n| n.children.is_empty()).count();
        let total_edges: usize = self.nodes.iter().map(|n| n.children.len()).sum();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            leaf_count,
            total_edges,
            root_visits: self.root_node().visits(),
        }
    }
}

impl<A: Clone + Eq + Hash + Debug> MCTSTree<A> {
    /// Render each node's mean value and visit count, indented by depth.
    ///
    /// Children are listed most-visited first. `max_depth` of `None` renders
    /// the whole tree.
    #[must_use]
    pub fn render(&self, max_depth: Option<u16>) -> String {
        let mut out = String::new();
        let root = self.root_node();
        let _ = writeln!(out, "root: {:.3} ({} visits)", root.value(), root.visits());

        // Explicit stack keeps deep trees off the call stack.
        let mut stack = self.sorted_children(self.root);
        stack.reverse();
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if max_depth.is_some_and(|d| node.depth > d) {
                continue;
            }
            if let Some(action) = &node.action {
                let indent = "  ".repeat(node.depth as usize);
                let _ = writeln!(
                    out,
                    "{}{:?}: {:.3} ({} visits)",
                    indent,
                    action,
                    node.value(),
                    node.visits()
                );
            }
            let mut children = self.sorted_children(id);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self.get(id).children.values().copied().collect();
        children.sort_by(|a, b| {
            self.get(*b)
                .visits()
                .cmp(&self.get(*a).visits())
                .then(a.raw().cmp(&b.raw()))
        });
        children
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Nodes without children.
    pub leaf_count: usize,

    /// Total parent-child links.
    pub total_edges: usize,

    /// Completed rollouts recorded at the root.
    pub root_visits: usize,
}

impl TreeStats {
    /// Average children per non-leaf node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let internal = self.node_count - self.leaf_count;
        if internal == 0 {
            0.0
        } else {
            self.total_edges as f64 / internal as f64
        }
    }
}
