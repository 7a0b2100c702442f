//! Core engine types: deterministic RNG and errors.
//!
//! Everything here is battle-agnostic. Battles plug in through
//! `rules::BattleState`.

pub mod error;
pub mod rng;

pub use error::{Result, SearchError};
pub use rng::{GameRng, GameRngState};
