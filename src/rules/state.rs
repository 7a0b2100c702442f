//! State abstraction the search runs against.
//!
//! Battles implement `BattleState` to expose their rules to the search:
//! - What actions are legal
//! - How actions modify state (resolving hidden randomness)
//! - How hidden randomness is resampled
//! - When the battle is over and how it scores

use std::fmt::Debug;
use std::hash::Hash;

use crate::core::GameRng;

/// A battle position seen from the acting side.
///
/// ## Implementation Notes
///
/// - `Action` equality is the identity used to key tree edges. It must be
///   stable across resamples: "play a Strike", not "play card instance #17".
/// - `legal_actions`: Return empty vec if no move is available. The order is
///   the deterministic enumeration order used to break ties.
/// - `apply`: Draw any hidden randomness from `rng` so seeded runs repeat.
/// - `resample`: Keep everything the acting side knows, re-resolve the rest.
/// - `score`: Sign and scale are owned by the battle.
pub trait BattleState: Clone {
    /// A move available at a decision point.
    type Action: Clone + Eq + Hash + Debug;

    /// Legal actions in enumeration order.
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// Apply an action in place.
    fn apply(&mut self, action: &Self::Action, rng: &mut GameRng);

    /// Copy with hidden randomness independently re-resolved.
    #[must_use]
    fn resample(&self, rng: &mut GameRng) -> Self;

    /// Check if the battle is over.
    fn is_terminal(&self) -> bool;

    /// Reward signal for backpropagation.
    fn score(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Coin-flip race: each step adds 1 or 2 at random, ends at 5.
    #[derive(Clone, Debug)]
    struct Race {
        position: u32,
    }

    impl BattleState for Race {
        type Action = u8;

        fn legal_actions(&self) -> Vec<u8> {
            if self.is_terminal() {
                vec![]
            } else {
                vec![0]
            }
        }

        fn apply(&mut self, _action: &u8, rng: &mut GameRng) {
            self.position += 1 + rng.gen_range_usize(0..2) as u32;
        }

        fn resample(&self, _rng: &mut GameRng) -> Self {
            self.clone()
        }

        fn is_terminal(&self) -> bool {
            self.position >= 5
        }

        fn score(&self) -> f64 {
            self.position as f64
        }
    }

    #[test]
    fn test_apply_is_seeded() {
        let play = |seed| {
            let mut rng = GameRng::new(seed);
            let mut race = Race { position: 0 };
            let mut steps = 0;
            while !race.is_terminal() {
                race.apply(&0, &mut rng);
                steps += 1;
            }
            (race.position, steps)
        };

        assert_eq!(play(9), play(9));
    }

    #[test]
    fn test_terminal_has_no_actions() {
        let race = Race { position: 6 };
        assert!(race.is_terminal());
        assert!(race.legal_actions().is_empty());
        assert_eq!(race.score(), 6.0);
    }
}
