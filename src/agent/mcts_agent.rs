//! MCTS-backed agent.

use log::{debug, warn};

use crate::core::{GameRng, Result, SearchError};
use crate::mcts::{MCTSConfig, MCTSSearch, RootParallelSearch, SearchStats};
use crate::rules::BattleState;

/// Agent that picks each action with a fresh MCTS search.
pub struct MCTSAgent {
    config: MCTSConfig,

    /// Seeds per-decision searches and the fallback choice.
    rng: GameRng,

    decisions: u64,
    fallbacks: u64,
    last_stats: Option<SearchStats>,
}

impl MCTSAgent {
    /// Create an agent, checking the configuration first.
    pub fn new(config: MCTSConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: GameRng::new(config.seed),
            config,
            decisions: 0,
            fallbacks: 0,
            last_stats: None,
        })
    }

    /// Choose the next action for `state`.
    ///
    /// - No legal actions: `SearchError::NoLegalActions`
    /// - One legal action: returned without searching
    /// - Otherwise: a fresh search; if it yields nothing, a uniformly
    ///   random legal action is returned and a warning is logged
    pub fn choose_action<S>(&mut self, state: &S) -> Result<S::Action>
    where
        S: BattleState + Sync,
        S::Action: Send,
    {
        let mut actions = state.legal_actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions);
        }
        if actions.len() == 1 {
            self.last_stats = None;
            return Ok(actions.swap_remove(0));
        }

        self.decisions += 1;
        let config = self.config.clone().with_seed(self.rng.fork().seed());

        let best = if config.workers > 1 {
            let mut search = RootParallelSearch::<S>::new(config);
            let best = search.decide(state)?;
            self.last_stats = Some(search.stats().clone());
            best
        } else {
            let mut search = MCTSSearch::<S>::new(config);
            let best = search.decide(state);
            self.last_stats = Some(search.stats().clone());
            best
        };

        match best {
            Some(action) => {
                debug!("decision {}: {:?}", self.decisions, action);
                Ok(action)
            }
            None => {
                warn!("MCTS did not return any action; falling back to a random legal action");
                self.fallbacks += 1;
                let idx = self.rng.gen_range_usize(0..actions.len());
                Ok(actions.swap_remove(idx))
            }
        }
    }

    /// Pick a target among `options`.
    ///
    /// Battles have a single enemy and no card targeting, so this is the
    /// first option.
    pub fn choose_target<'a, T>(&self, options: &'a [T]) -> Option<&'a T> {
        options.first()
    }

    /// Statistics of the last search, if one ran.
    #[must_use]
    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    /// Searched decisions so far.
    #[must_use]
    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    /// Decisions that fell back to a random action.
    #[must_use]
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}
