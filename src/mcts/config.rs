//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use super::policy::FinalSelection;
use crate::core::{Result, SearchError};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// Search iterations per decision.
    pub iterations: u32,

    /// UCB1 exploration constant `C` (default: 0.5).
    /// Shared by every node of one tree.
    pub exploration_constant: f64,

    /// Random seed for the search RNG.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Rule for extracting the final action from the root.
    pub final_selection: FinalSelection,

    /// Maximum random actions per rollout (0 = play to the end).
    pub max_rollout_steps: u32,

    /// Wall-clock budget per decision in milliseconds.
    /// When set, replaces the iteration count; at least one iteration runs.
    pub time_budget_ms: Option<u64>,

    /// Independent trees searched in parallel (root parallelization).
    pub workers: usize,

    /// Log the rendered tree after each decision.
    pub verbose: bool,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            exploration_constant: 0.5,
            seed: 42,
            final_selection: FinalSelection::RobustChild,
            max_rollout_steps: 0,
            time_budget_ms: None,
            workers: 1,
            verbose: false,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom iteration count.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a final-action rule.
    pub fn with_final_selection(mut self, selection: FinalSelection) -> Self {
        self.final_selection = selection;
        self
    }

    /// Create a new config with a rollout step cap.
    pub fn with_max_rollout_steps(mut self, steps: u32) -> Self {
        self.max_rollout_steps = steps;
        self
    }

    /// Create a new config with a wall-clock budget.
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }

    /// Create a new config with a worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create a new config with tree logging switched on or off.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the parameters the search relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.workers == 0 {
            return Err(SearchError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert_eq!(config.iterations, 100);
        assert!((config.exploration_constant - 0.5).abs() < 1e-12);
        assert_eq!(config.seed, 42);
        assert_eq!(config.final_selection, FinalSelection::RobustChild);
        assert_eq!(config.time_budget_ms, None);
        assert_eq!(config.workers, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_iterations(500)
            .with_exploration(2.0)
            .with_seed(123)
            .with_final_selection(FinalSelection::MaxChild)
            .with_max_rollout_steps(40)
            .with_time_budget_ms(25)
            .with_workers(4)
            .with_verbose(true);

        assert_eq!(config.iterations, 500);
        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.final_selection, FinalSelection::MaxChild);
        assert_eq!(config.max_rollout_steps, 40);
        assert_eq!(config.time_budget_ms, Some(25));
        assert_eq!(config.workers, 4);
        assert!(config.verbose);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = MCTSConfig::default().with_exploration(-1.0);
        assert!(matches!(config.validate(), Err(SearchError::InvalidConfig(_))));

        let config = MCTSConfig::default().with_exploration(f64::NAN);
        assert!(config.validate().is_err());

        let config = MCTSConfig::default().with_workers(0);
        assert!(config.validate().is_err());

        // C = 0 is pure exploitation, still valid
        let config = MCTSConfig::default().with_exploration(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default().with_final_selection(FinalSelection::MaxChild);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MCTSConfig =
            serde_json::from_str(r#"{ "iterations": 250, "exploration_constant": 1.2 }"#).unwrap();
        assert_eq!(config.iterations, 250);
        assert_eq!(config.exploration_constant, 1.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.workers, 1);
    }
}
