//! Monte Carlo Tree Search for battle-mcts.
//!
//! ## Overview
//!
//! This module implements single-decision MCTS for stochastic battles with
//! hidden information. Key features:
//!
//! - **Fresh tree per decision**: built, searched, and dropped in one call
//! - **Resampling**: every iteration and every rollout re-resolves hidden state
//! - **Weighted UCB1 selection**: children sampled in proportion to UCB1
//! - **Legality drift**: children of currently illegal actions are kept but skipped
//! - **Configurable final pick**: robust child (most visits) or max child
//! - **Root parallelization**: independent trees merged at the root
//!
//! ## Usage
//!
//! ```rust
//! use battle_mcts::games::duel::DuelBuilder;
//! use battle_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let state = DuelBuilder::new().build(42);
//! let mut search = MCTSSearch::new(MCTSConfig::default());
//!
//! if let Some(action) = search.search(&state, 200) {
//!     println!("Best action: {:?}", action);
//! }
//! ```

pub mod config;
pub mod node;
pub mod parallel;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{MCTSNode, NodeId};
pub use parallel::RootParallelSearch;
pub use policy::{FinalSelection, RandomRollout, SelectionPolicy, SimulationPolicy, UCB1};
pub use search::{ChildSummary, MCTSSearch};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
