//! Core MCTS search algorithm.
//!
//! Each decision builds a fresh tree. Every iteration resamples the root
//! state, descends by UCB1-weighted sampling, expands one missing action,
//! rolls out from an independently resampled copy of the new leaf, and
//! backpropagates the score to the root.

use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use smallvec::SmallVec;

use crate::core::{GameRng, Result};
use crate::rules::BattleState;

use super::config::MCTSConfig;
use super::node::NodeId;
use super::policy::{RandomRollout, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Visit totals for one root child.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildSummary<A> {
    /// Action leading to the child.
    pub action: A,
    /// Completed rollouts through the child.
    pub visits: usize,
    /// Sum of their rewards.
    pub total: f64,
}

impl<A> ChildSummary<A> {
    /// Mean reward (0 when unvisited).
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / self.visits as f64
        }
    }
}

/// What the root position allows before any search is run.
pub(crate) enum RootCheck<A> {
    /// Terminal or no legal moves.
    NoMoves,
    /// Exactly one legal move; no search needed.
    Only(A),
    /// A real choice.
    Search,
}

pub(crate) fn root_check<S: BattleState>(state: &S) -> RootCheck<S::Action> {
    if state.is_terminal() {
        return RootCheck::NoMoves;
    }
    let mut actions = state.legal_actions();
    match actions.len() {
        0 => RootCheck::NoMoves,
        1 => RootCheck::Only(actions.swap_remove(0)),
        _ => RootCheck::Search,
    }
}

/// Main MCTS search context.
///
/// Generic over the battle state type. Owns the search tree and
/// configuration, and provides methods to run searches.
pub struct MCTSSearch<S: BattleState> {
    /// Search configuration.
    config: MCTSConfig,

    /// The search tree (rebuilt per decision).
    tree: MCTSTree<S::Action>,

    /// RNG for resampling, selection, expansion and rollouts.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy<S>>,

    /// Search statistics.
    stats: SearchStats,
}

impl<S: BattleState> MCTSSearch<S> {
    /// Create a new MCTS search context.
    ///
    /// The configuration is not checked; an invalid one is logged and used
    /// as given. Use `try_new` to reject it instead.
    pub fn new(config: MCTSConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!("search created with {}", err);
        }
        Self {
            tree: MCTSTree::new(config.exploration_constant),
            rng: GameRng::new(config.seed),
            config,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomRollout),
            stats: SearchStats::default(),
        }
    }

    /// Create a new MCTS search context, rejecting an invalid configuration.
    pub fn try_new(config: MCTSConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Set a custom selection policy.
    pub fn with_selection<P: SelectionPolicy + 'static>(mut self, selection: P) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<P: SimulationPolicy<S> + 'static>(mut self, simulation: P) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Run a search with the budget from the configuration.
    ///
    /// Uses `time_budget_ms` when set, otherwise `iterations`.
    pub fn decide(&mut self, state: &S) -> Option<S::Action> {
        match self.config.time_budget_ms {
            Some(ms) => self.search_until(state, Duration::from_millis(ms)),
            None => self.search(state, self.config.iterations),
        }
    }

    /// Run MCTS search for a given number of iterations.
    ///
    /// Returns the best action, the only action when there is no choice, or
    /// `None` when there is nothing to decide or no child was built.
    pub fn search(&mut self, state: &S, iterations: u32) -> Option<S::Action> {
        let start = Instant::now();
        self.begin();

        match root_check(state) {
            RootCheck::NoMoves => return None,
            RootCheck::Only(action) => return Some(action),
            RootCheck::Search => {}
        }

        debug!("search: {} iterations, c = {}", iterations, self.tree.exploration());
        for _ in 0..iterations {
            self.iterate(state);
        }

        self.finish(start);
        self.get_best(state)
    }

    /// Run MCTS search until `budget` has elapsed.
    ///
    /// At least one iteration always completes before the decision.
    pub fn search_until(&mut self, state: &S, budget: Duration) -> Option<S::Action> {
        let start = Instant::now();
        self.begin();

        match root_check(state) {
            RootCheck::NoMoves => return None,
            RootCheck::Only(action) => return Some(action),
            RootCheck::Search => {}
        }

        debug!("search: {:?} budget, c = {}", budget, self.tree.exploration());
        loop {
            self.iterate(state);
            if start.elapsed() >= budget {
                break;
            }
        }

        self.finish(start);
        self.get_best(state)
    }

    fn begin(&mut self) {
        self.stats.reset();
        self.tree.reset(self.config.exploration_constant);
    }

    fn finish(&mut self, start: Instant) {
        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            "search finished: {} iterations, {} nodes, {:.0} it/s",
            self.stats.iterations,
            self.tree.len(),
            self.stats.iterations_per_second()
        );
        if self.config.verbose {
            info!("search tree:\n{}", self.tree.render(None));
        }
    }

    /// One iteration on a private resample of the root state.
    fn iterate(&mut self, state: &S) {
        let mut working = state.resample(&mut self.rng);
        self.step(&mut working);
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    ///
    /// `state` is the working copy for this iteration and is mutated while
    /// descending.
    pub fn step(&mut self, state: &mut S) {
        let root = self.tree.root();
        self.select(root, state);
        self.stats.iterations += 1;
    }

    /// Descend from `node`, applying chosen actions to `state`.
    fn select(&mut self, node: NodeId, state: &mut S) {
        let mut current = node;

        loop {
            if state.is_terminal() {
                self.rollout(current, state);
                return;
            }

            let legal = state.legal_actions();
            if legal.is_empty() {
                self.rollout(current, state);
                return;
            }

            // Resampled hidden state can legalize actions never seen here
            let missing: SmallVec<[usize; 8]> =
                self.tree.get(current).missing_actions(&legal).collect();
            if !missing.is_empty() {
                self.expand(current, state, &legal, &missing);
                return;
            }

            // Children of currently illegal actions stay in the tree but are
            // left out of this iteration's weighting.
            let parent = self.tree.get(current);
            let parent_visits = parent.visits();
            let c = self.tree.exploration();
            let candidates: SmallVec<[(usize, NodeId); 8]> = legal
                .iter()
                .enumerate()
                .filter_map(|(i, a)| parent.child(a).map(|id| (i, id)))
                .collect();
            let weights: SmallVec<[f64; 8]> = candidates
                .iter()
                .map(|&(_, id)| {
                    let child = self.tree.get(id);
                    self.selection.weight(parent_visits, child.visits(), child.value(), c)
                })
                .collect();

            let pick = match self.rng.choose_weighted(&weights) {
                Some(i) => i,
                None => self.rng.gen_range_usize(0..candidates.len()),
            };
            let (action_idx, child) = candidates[pick];

            state.apply(&legal[action_idx], &mut self.rng);
            current = child;
        }
    }

    /// Add one child for a random action from `available` and roll out.
    ///
    /// `available` holds indices into `legal` of actions without a child.
    fn expand(&mut self, node: NodeId, state: &mut S, legal: &[S::Action], available: &[usize]) {
        let pick = available[self.rng.gen_range_usize(0..available.len())];
        let action = &legal[pick];

        let child = self.tree.alloc_child(node, action.clone());
        self.stats.nodes_expanded += 1;
        let depth = self.tree.get(child).depth;
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }
        trace!("expand {:?} at depth {}", action, depth);

        state.apply(action, &mut self.rng);
        self.rollout(child, state);
    }

    /// Play a fresh resample of `state` to the end and record the score.
    fn rollout(&mut self, node: NodeId, state: &S) {
        let mut sim_rng = self.rng.fork();
        let mut sample = state.resample(&mut sim_rng);
        let result = self
            .simulation
            .simulate(&mut sample, &mut sim_rng, self.config.max_rollout_steps);
        self.stats.simulations += 1;
        self.backpropagate(node, result);
    }

    fn backpropagate(&mut self, node: NodeId, result: f64) {
        self.tree.backpropagate(node, result);
    }

    /// Pick the decision among root children whose action is legal in `state`.
    ///
    /// Applies the configured `FinalSelection`; ties fall back to the order
    /// of `state.legal_actions()`. Returns `None` when no legal action has a
    /// child.
    pub fn get_best(&self, state: &S) -> Option<S::Action> {
        let root = self.tree.root_node();
        let legal = state.legal_actions();

        let mut actions: SmallVec<[&S::Action; 8]> = SmallVec::new();
        let mut candidates: SmallVec<[(usize, f64); 8]> = SmallVec::new();
        for action in &legal {
            if let Some(id) = root.child(action) {
                let child = self.tree.get(id);
                actions.push(action);
                candidates.push((child.visits(), child.value()));
            }
        }

        self.config
            .final_selection
            .choose(&candidates)
            .map(|i| actions[i].clone())
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree<S::Action> {
        &self.tree
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Get action visit counts from root.
    pub fn action_visits(&self) -> Vec<(S::Action, usize)> {
        self.root_children()
            .into_iter()
            .map(|c| (c.action, c.visits))
            .collect()
    }

    /// Totals for every root child, legal or not.
    pub fn root_children(&self) -> Vec<ChildSummary<S::Action>> {
        let mut children: Vec<_> = self
            .tree
            .root_node()
            .children
            .iter()
            .map(|(action, &id)| (id, action))
            .collect();
        children.sort_by_key(|(id, _)| id.raw());

        children
            .into_iter()
            .map(|(id, action)| {
                let node = self.tree.get(id);
                ChildSummary {
                    action: action.clone(),
                    visits: node.visits(),
                    total: node.total(),
                }
            })
            .collect()
    }
}
