//! State abstraction for battles.
//!
//! Battles implement `BattleState` to define:
//! - Legal actions for each position
//! - How actions modify state
//! - How hidden randomness is resampled
//! - Terminal detection and scoring
//!
//! The search calls into `BattleState` but never interprets
//! battle-specific concepts directly.

pub mod state;

pub use state::BattleState;
