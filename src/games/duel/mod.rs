//! Duel: a small stochastic card battle for exercising the search.
//!
//! - The player starts with 50 health, 3 energy per turn and a 12-card deck
//! - Cards: Strike (6 damage), Defend (5 block), Bash (10 damage), Quickdraw
//! - Ending the turn discards the hand; the enemy hits for a random amount
//! - Reduce the enemy to 0 health before the turn limit to win
//!
//! Hidden information is the draw-pile order and the enemy's damage roll.

mod game;

pub use game::{CardKind, DuelAction, DuelBuilder, DuelState};
