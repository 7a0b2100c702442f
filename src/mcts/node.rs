//! MCTS node structure.
//!
//! Uses arena-based allocation with index references (NodeId). A node owns
//! its children through the arena; the parent index is only walked upward
//! during backpropagation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree.
///
/// Represents the position reached by a sequence of actions from the root.
/// Concrete states are never stored: hidden randomness is resampled on every
/// iteration, so only the action path identifies a node.
#[derive(Clone, Debug)]
pub struct MCTSNode<A> {
    /// Action that produced this node (None for root).
    pub action: Option<A>,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Children keyed by action identity.
    pub children: FxHashMap<A, NodeId>,

    /// Rewards of every rollout whose path passed through this node.
    pub results: Vec<f64>,
}

impl<A: Eq + Hash> MCTSNode<A> {
    /// Create a new child node.
    pub fn new(action: A, parent: NodeId, depth: u16) -> Self {
        Self {
            action: Some(action),
            parent,
            depth,
            children: FxHashMap::default(),
            results: Vec::new(),
        }
    }

    /// Create a root node.
    pub fn root() -> Self {
        Self {
            action: None,
            parent: NodeId::NONE,
            depth: 0,
            children: FxHashMap::default(),
            results: Vec::new(),
        }
    }

    /// Number of completed rollouts through this node.
    #[inline]
    #[must_use]
    pub fn visits(&self) -> usize {
        self.results.len()
    }

    /// Sum of observed rewards.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.results.iter().sum()
    }

    /// Mean observed reward (0 when unvisited).
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.total() / self.results.len() as f64
        }
    }

    /// Child reached by `action`, if expanded.
    #[inline]
    #[must_use]
    pub fn child(&self, action: &A) -> Option<NodeId> {
        self.children.get(action).copied()
    }

    /// Check if the root sentinel applies.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Indices into `legal` of actions without a child yet.
    pub fn missing_actions<'a>(&'a self, legal: &'a [A]) -> impl Iterator<Item = usize> + 'a {
        legal
            .iter()
            .enumerate()
            .filter(|(_, a)| !self.children.contains_key(a))
            .map(|(i, _)| i)
    }
}
