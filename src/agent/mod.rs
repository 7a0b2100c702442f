//! Agent entry point: one fresh search per decision.
//!
//! Short-circuits trivial decisions, substitutes a random legal action when
//! the search yields none, and passes target choices straight through.

mod mcts_agent;

pub use mcts_agent::MCTSAgent;
