//! # battle-mcts
//!
//! A Monte Carlo Tree Search decision engine for turn-based, stochastic,
//! hidden-information card battles.
//!
//! ## Design Principles
//!
//! 1. **Battle-Agnostic**: The search only sees `BattleState`. Rules,
//!    scoring, and hidden-state resampling belong to the battle.
//!
//! 2. **One Tree per Decision**: A fresh tree is built for every decision
//!    and dropped when the action is returned. Nothing is reused.
//!
//! 3. **Configuration Over Convention**: Iterations, exploration constant,
//!    final-action rule, and budgets live in `MCTSConfig`.
//!
//! ## Architecture
//!
//! - **Arena Tree**: Nodes live in a flat vector addressed by `NodeId`;
//!   parents are indices, so backpropagation is an iterative walk.
//!
//! - **Resampled Iterations**: Each iteration and each rollout works on an
//!   independently resampled state, so leaf values reflect the distribution
//!   of hidden outcomes.
//!
//! - **Deterministic RNG**: Same seed, same state, same tree.
//!
//! ## Modules
//!
//! - `core`: RNG and error types
//! - `rules`: `BattleState` trait for battle implementations
//! - `mcts`: Monte Carlo Tree Search
//! - `agent`: Per-decision entry point with fallbacks
//! - `games`: Sample battles

pub mod core;
pub mod rules;
pub mod mcts;
pub mod agent;
pub mod games;

// Re-export commonly used types
pub use crate::core::{GameRng, GameRngState, Result, SearchError};

pub use crate::rules::BattleState;

pub use crate::mcts::{
    ChildSummary, FinalSelection, MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, NodeId,
    RandomRollout, RootParallelSearch, SearchStats, SelectionPolicy, SimulationPolicy,
    TreeStats, UCB1,
};

pub use crate::agent::MCTSAgent;
