//! Deterministic random number generation with forking for MCTS.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Forkable**: Create independent branches for rollouts and workers
//! - **Serializable**: O(1) state capture and restore
//! - **Categorical sampling**: Weighted choice over UCB1 weights
//!
//! ## MCTS Usage
//!
//! ```
//! use battle_mcts::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//!
//! // Fork for a rollout
//! let mut sim_rng = rng.fork();
//!
//! // Parent and fork produce different sequences
//! assert_ne!(rng.gen_range_usize(0..1000), sim_rng.gen_range_usize(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG with forking for MCTS simulations.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence. Fork seeds
    /// are scrambled, so forks of forks do not collide with their parent's
    /// later siblings.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = mix_seed(self.seed, self.fork_counter);
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    ///
    /// Panics if the range is empty.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random i64 in the given inclusive range.
    pub fn gen_range_inclusive(&mut self, range: std::ops::RangeInclusive<i64>) -> i64 {
        self.inner.gen_range(range)
    }

    /// Uniform float in `[0, 1)`.
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose an index with probability proportional to its weight.
    ///
    /// Weights do not need to sum to 1.0. Negative and NaN weights count as
    /// zero. A single uniform draw is taken against the cumulative mass.
    ///
    /// Returns `None` if weights are empty or carry no positive mass.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let mass = |w: f64| if w > 0.0 { w } else { 0.0 };

        let total: f64 = weights.iter().copied().map(mass).sum();
        if !(total > 0.0) || !total.is_finite() {
            return None;
        }

        let mut threshold = self.gen_f64() * total;
        let mut last_positive = None;

        for (i, &weight) in weights.iter().enumerate() {
            let w = mass(weight);
            if w == 0.0 {
                continue;
            }
            last_positive = Some(i);
            threshold -= w;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last positive weight
        last_positive
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// SplitMix64 finalizer over `seed` offset by `counter` golden-ratio steps.
fn mix_seed(seed: u64, counter: u64) -> u64 {
    let mut z = seed.wrapping_add(counter.wrapping_mul(0x9E3779B97F4A7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Serializable RNG state for reproducing a search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}
