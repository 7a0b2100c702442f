//! MCTS policies for selection, simulation, and final action extraction.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to weight explored children (UCB1)
//! - `SimulationPolicy`: How to run rollouts (random)
//! - `FinalSelection`: Which root child becomes the decision

use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::rules::BattleState;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for weighting children during selection.
///
/// The search samples a child with probability proportional to its weight,
/// falling back to a uniform choice when no weight is positive.
pub trait SelectionPolicy: Send + Sync {
    /// Weight of a child given the parent's visit count.
    ///
    /// `child_visits == 0` must yield 0 (forced-exploration candidate).
    fn weight(&self, parent_visits: usize, child_visits: usize, child_value: f64, c: f64) -> f64;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a)), where N is the parent's visits.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn weight(&self, parent_visits: usize, child_visits: usize, child_value: f64, c: f64) -> f64 {
        if child_visits == 0 {
            return 0.0;
        }

        // ln(1) = 0: a parent on its first revisit weighs children by value alone.
        let ln_parent = (parent_visits.max(1) as f64).ln();
        child_value + c * (ln_parent / child_visits as f64).sqrt()
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running simulations (rollouts) from a leaf.
pub trait SimulationPolicy<S: BattleState>: Send + Sync {
    /// Play `state` forward and return its score.
    ///
    /// The state is modified during simulation. `max_steps` of 0 means
    /// play until terminal.
    fn simulate(&self, state: &mut S, rng: &mut GameRng, max_steps: u32) -> f64;
}

/// Random simulation policy.
///
/// Plays uniformly random legal actions until terminal or the step limit.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl<S: BattleState> SimulationPolicy<S> for RandomRollout {
    fn simulate(&self, state: &mut S, rng: &mut GameRng, max_steps: u32) -> f64 {
        let mut steps = 0;

        while !state.is_terminal() {
            if max_steps > 0 && steps >= max_steps {
                break;
            }

            let actions = state.legal_actions();
            let Some(action) = rng.choose(&actions) else {
                // Stuck but not terminal: score it where it stands
                break;
            };
            state.apply(action, rng);

            steps += 1;
        }

        state.score()
    }
}

// =============================================================================
// Final Selection
// =============================================================================

/// Rule for picking the decision among root children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalSelection {
    /// Most visits; ties by higher mean, then enumeration order.
    #[default]
    RobustChild,
    /// Highest mean; ties by more visits, then enumeration order.
    MaxChild,
}

impl FinalSelection {
    /// Pick an index from `(visits, value)` candidates in enumeration order.
    ///
    /// Returns `None` for an empty slice. Earlier candidates win full ties.
    #[must_use]
    pub fn choose(self, candidates: &[(usize, f64)]) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (i, &(visits, value)) in candidates.iter().enumerate() {
            let Some(b) = best else {
                best = Some(i);
                continue;
            };
            let (best_visits, best_value) = candidates[b];

            let better = match self {
                FinalSelection::RobustChild => {
                    visits > best_visits || (visits == best_visits && value > best_value)
                }
                FinalSelection::MaxChild => {
                    value > best_value || (value == best_value && visits > best_visits)
                }
            };
            if better {
                best = Some(i);
            }
        }

        best
    }
}
