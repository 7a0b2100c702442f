//! Root-parallel MCTS.
//!
//! Runs independent trees on scoped threads, each with its own forked seed,
//! and merges only the root children's totals before the final pick. No
//! mutable state is shared between workers.

use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use rustc_hash::FxHashMap;

use crate::core::{GameRng, Result, SearchError};
use crate::rules::BattleState;

use super::config::MCTSConfig;
use super::search::{root_check, ChildSummary, MCTSSearch, RootCheck};
use super::stats::SearchStats;

/// Root-parallel search over `config.workers` independent trees.
///
/// Workers use the default UCB1 selection and random rollouts.
pub struct RootParallelSearch<S: BattleState> {
    config: MCTSConfig,
    merged: Vec<ChildSummary<S::Action>>,
    stats: SearchStats,
}

impl<S> RootParallelSearch<S>
where
    S: BattleState + Sync,
    S::Action: Send,
{
    /// Create a new root-parallel search.
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            config,
            merged: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Split the budget over the workers, merge their roots, and decide.
    ///
    /// The iteration budget is divided so the workers complete
    /// `config.iterations` in total. A time budget applies to each worker.
    pub fn decide(&mut self, state: &S) -> Result<Option<S::Action>> {
        self.config.validate()?;
        self.merged.clear();
        self.stats.reset();

        match root_check(state) {
            RootCheck::NoMoves => return Ok(None),
            RootCheck::Only(action) => return Ok(Some(action)),
            RootCheck::Search => {}
        }

        let start = Instant::now();
        let workers = self.config.workers;
        let mut seeder = GameRng::new(self.config.seed);
        let plans: Vec<MCTSConfig> = (0..workers)
            .map(|i| {
                let share = self.config.iterations / workers as u32
                    + u32::from((i as u32) < self.config.iterations % workers as u32);
                self.config
                    .clone()
                    .with_seed(seeder.fork().seed())
                    .with_iterations(share)
                    .with_workers(1)
                    .with_verbose(false)
            })
            .collect();

        let outcomes = thread::scope(|scope| {
            let handles: Vec<_> = plans
                .into_iter()
                .map(|plan| {
                    scope.spawn(move || {
                        let mut search = MCTSSearch::<S>::new(plan);
                        match search.config().time_budget_ms {
                            Some(ms) => {
                                search.search_until(state, Duration::from_millis(ms));
                            }
                            None => {
                                let iterations = search.config().iterations;
                                search.search(state, iterations);
                            }
                        }
                        (search.root_children(), search.stats().clone())
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(i, handle)| {
                    handle
                        .join()
                        .map_err(|_| SearchError::WorkerPanicked(format!("worker {}", i)))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut totals: FxHashMap<S::Action, (usize, f64)> = FxHashMap::default();
        let mut order: Vec<S::Action> = Vec::new();
        for (children, stats) in outcomes {
            self.stats.merge(&stats);
            for child in children {
                let entry = totals.entry(child.action.clone()).or_insert_with(|| {
                    order.push(child.action.clone());
                    (0, 0.0)
                });
                entry.0 += child.visits;
                entry.1 += child.total;
            }
        }
        self.merged = order
            .into_iter()
            .map(|action| {
                let (visits, total) = totals[&action];
                ChildSummary { action, visits, total }
            })
            .collect();
        self.stats.time_us = start.elapsed().as_micros() as u64;

        debug!(
            "root-parallel search: {} workers, {} iterations, {} root children",
            workers,
            self.stats.iterations,
            self.merged.len()
        );

        Ok(self.get_best(state))
    }

    /// Apply the final-selection rule over merged root totals.
    pub fn get_best(&self, state: &S) -> Option<S::Action> {
        let legal = state.legal_actions();
        let mut actions = Vec::new();
        let mut candidates = Vec::new();
        for action in &legal {
            if let Some(child) = self.merged.iter().find(|c| &c.action == action) {
                actions.push(action);
                candidates.push((child.visits, child.value()));
            }
        }

        self.config
            .final_selection
            .choose(&candidates)
            .map(|i| actions[i].clone())
    }

    /// Merged root children of the last decision.
    #[must_use]
    pub fn merged_children(&self) -> &[ChildSummary<S::Action>] {
        &self.merged
    }

    /// Combined statistics of the last decision.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}
