//! UCT search implementation.
//!
//! Each iteration runs the four phases of the algorithm:
//! 1. Selection: descend from the root through fully expanded nodes by UCB1
//! 2. Expansion: add one child for an untried action of the first node that
//!    still has some
//! 3. Simulation: play uniformly random moves from a copy of the new state
//!    until the game ends, then score it with the reward function
//! 4. Backpropagation: update visit counts and rewards from the new node up
//!    to the root

use std::time::{Duration, Instant};

use engine_core::{GameState, PlayerId, RewardFn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{FinalSelection, UctConfig};
use crate::node::{distinct_moves, NodeId};
use crate::policy::{ActionChooser, UniformRandom};
use crate::tree::UctTree;

/// Errors that can occur during UCT search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Budget exhausted after {iterations} iterations without expanding the root")]
    InsufficientBudget { iterations: u32 },

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Chooser picked index {index} out of {candidates} candidates")]
    InvalidChoice { index: usize, candidates: usize },

    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Reward {0} is outside [0, 1]")]
    RewardOutOfRange(f64),

    #[error("Rollout did not finish within {0} moves")]
    RolloutDepthExceeded(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Visit statistics of one root child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub visits: u32,
    pub mean_reward: f64,
}

/// Result of a UCT search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Recommended action
    pub action: A,

    /// Mean reward of the recommended child
    pub value: f64,

    /// Visits of the recommended child
    pub visits: u32,

    /// Iterations performed, including extension rounds
    pub iterations: u32,

    /// Wall-clock time spent searching
    pub elapsed: Duration,

    /// Extra budget rounds run because the best and most visited children
    /// disagreed
    pub extensions: u32,

    /// Statistics for every root child, in creation order
    pub children: Vec<ChildStats<A>>,
}

/// UCT search state.
///
/// The search owns its tree and both choosers; the reward function is
/// borrowed. `run` may be called again to keep growing the same tree, also
/// after a run that returned an error.
pub struct UctSearch<'a, S, F, X, R>
where
    S: GameState,
    F: RewardFn<S> + ?Sized,
{
    tree: UctTree<S>,
    reward: &'a F,
    expansion: X,
    rollout: R,
    config: UctConfig,
    searcher: PlayerId,
    iterations: u32,
}

impl<'a, S, F, X, R> UctSearch<'a, S, F, X, R>
where
    S: GameState,
    F: RewardFn<S> + ?Sized,
    X: ActionChooser<S>,
    R: ActionChooser<S>,
{
    /// Create a new search rooted at `state`.
    ///
    /// Rewards are interpreted from the point of view of the player to move
    /// in `state`.
    pub fn new(state: S, reward: &'a F, expansion: X, rollout: R, config: UctConfig) -> Self {
        let searcher = state.current_player();
        Self {
            tree: UctTree::new(state),
            reward,
            expansion,
            rollout,
            config,
            searcher,
            iterations: 0,
        }
    }

    /// Run the search within the configured budget and recommend an action.
    pub fn run(&mut self) -> Result<SearchResult<S::Action>, SearchError> {
        self.config.validate()?;

        let start = Instant::now();
        let root_id = self.tree.root();
        let root = self.tree.get(root_id);
        if root.is_terminal {
            return Err(SearchError::NoLegalMoves);
        }

        let forced = root.children.len() + root.untried.len() == 1;
        let before = self.iterations;
        if forced {
            self.iterate()?;
        } else {
            self.run_round()?;
        }

        if self.tree.get(root_id).children.is_empty() {
            let iterations = self.iterations - before;
            warn!(iterations, budget = ?self.config.budget, "Budget exhausted before the root was expanded");
            return Err(SearchError::InsufficientBudget { iterations });
        }

        let mut extensions = 0;
        if !forced {
            while extensions < self.config.robust_extensions && !self.root_is_settled()? {
                extensions += 1;
                debug!(extension = extensions, "Best and most visited root children differ, extending search");
                self.run_round()?;
            }
        }

        let chosen = match self.config.final_selection {
            FinalSelection::Exploitation => self.tree.best_child(root_id, 0.0)?,
            FinalSelection::MostVisited => {
                self.tree.most_visited_child(root_id).ok_or_else(|| {
                    SearchError::InvariantViolation("root lost its children".to_string())
                })?
            }
        };

        let child = self.tree.get(chosen);
        let action = child.action.clone().ok_or_else(|| {
            SearchError::InvariantViolation(format!("child {} has no action", chosen.0))
        })?;

        let result = SearchResult {
            action,
            value: child.mean_reward(),
            visits: child.visit_count,
            iterations: self.iterations - before,
            elapsed: start.elapsed(),
            extensions,
            children: self.tree.root_children_stats(),
        };

        debug!(
            iterations = result.iterations,
            nodes = self.tree.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            action = ?result.action,
            value = result.value,
            "UCT search complete"
        );

        Ok(result)
    }

    /// Run iterations until the budget is spent. Returns the count.
    fn run_round(&mut self) -> Result<u32, SearchError> {
        let start = Instant::now();
        let mut done = 0;
        while self.config.budget.allows(done, start.elapsed()) {
            self.iterate()?;
            done += 1;
        }
        Ok(done)
    }

    /// True when no root child has strictly more visits than the
    /// exploitation pick.
    fn root_is_settled(&self) -> Result<bool, SearchError> {
        let root_id = self.tree.root();
        let best = self.tree.get(self.tree.best_child(root_id, 0.0)?).visit_count;
        Ok(self
            .tree
            .get(root_id)
            .children
            .iter()
            .all(|&id| self.tree.get(id).visit_count <= best))
    }

    /// Run a single iteration (select/expand -> simulate -> backpropagate).
    ///
    /// A failed rollout removes the child it was started from, so the tree
    /// never holds an unvisited node between iterations.
    fn iterate(&mut self) -> Result<(), SearchError> {
        let (leaf_id, expanded_slot) = self.tree_policy()?;
        let delta = match self.simulate(leaf_id) {
            Ok(delta) => delta,
            Err(err) => {
                if let Some(slot) = expanded_slot {
                    self.tree.discard_leaf(leaf_id, slot)?;
                }
                return Err(err);
            }
        };
        self.tree
            .backpropagate(leaf_id, delta, self.config.attribution, self.searcher);
        self.iterations += 1;

        trace!(
            iteration = self.iterations,
            leaf = leaf_id.0,
            delta = delta,
            "UCT iteration complete"
        );

        Ok(())
    }

    /// Descend from the root and return the node to simulate from: a terminal
    /// node, or a freshly expanded child together with the untried slot its
    /// action came from.
    fn tree_policy(&mut self) -> Result<(NodeId, Option<usize>), SearchError> {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);

            if node.is_terminal {
                return Ok((current, None));
            }

            if !node.is_fully_expanded() {
                let (child, slot) = self.expand(current)?;
                return Ok((child, Some(slot)));
            }

            current = self.tree.best_child(current, self.config.exploration)?;
        }
    }

    /// Add one child for an untried action picked by the expansion chooser.
    fn expand(&mut self, node_id: NodeId) -> Result<(NodeId, usize), SearchError> {
        let node = self.tree.get(node_id);
        let index = self.expansion.choose(&node.state, &node.untried);
        let action = node
            .untried
            .get(index)
            .cloned()
            .ok_or(SearchError::InvalidChoice {
                index,
                candidates: node.untried.len(),
            })?;

        let child = self.tree.add_child(node_id, action)?;
        Ok((child, index))
    }

    /// Play out a copy of the node's state to the end and score it.
    fn simulate(&mut self, node_id: NodeId) -> Result<f64, SearchError> {
        let mut state = self.tree.get(node_id).state.clone();
        let mut depth = 0u32;

        while !state.is_game_over() {
            let moves = distinct_moves(&state);
            if moves.is_empty() {
                break;
            }
            if let Some(limit) = self.config.max_rollout_depth {
                if depth >= limit {
                    return Err(SearchError::RolloutDepthExceeded(limit));
                }
            }

            let index = self.rollout.choose(&state, &moves);
            let action = moves.get(index).ok_or(SearchError::InvalidChoice {
                index,
                candidates: moves.len(),
            })?;
            state = state.apply_action(action);
            depth += 1;
        }

        let reward = self.reward.reward(&state);
        if !(0.0..=1.0).contains(&reward) {
            return Err(SearchError::RewardOutOfRange(reward));
        }
        Ok(reward)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &UctTree<S> {
        &self.tree
    }

    /// Consume the search and keep its tree.
    pub fn into_tree(self) -> UctTree<S> {
        self.tree
    }

    /// Total iterations performed by every `run` so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Convenience function to run a single UCT search with uniform random
/// expansion and rollout choosers seeded from `rng`.
pub fn run_uct<S, F>(
    state: S,
    reward: &F,
    config: UctConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<S::Action>, SearchError>
where
    S: GameState,
    F: RewardFn<S> + ?Sized,
{
    let expansion = UniformRandom::new(ChaCha20Rng::seed_from_u64(rng.gen()));
    let rollout = UniformRandom::new(ChaCha20Rng::seed_from_u64(rng.gen()));
    let mut search = UctSearch::new(state, reward, expansion, rollout, config);
    search.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Attribution;
    use games_tictactoe::{win_reward, Action, State};

    fn rng(seed: u64) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(seed)
    }

    /// Single-player game: pick a number once, scored as number / 4.
    #[derive(Debug, Clone)]
    struct PickOne {
        picked: Option<u8>,
    }

    impl GameState for PickOne {
        type Action = u8;

        fn possible_moves(&self) -> Vec<u8> {
            match self.picked {
                None => vec![0, 1, 2, 3, 4, 2, 0],
                Some(_) => Vec::new(),
            }
        }

        fn is_game_over(&self) -> bool {
            self.picked.is_some()
        }

        fn apply_action(&self, action: &u8) -> Self {
            PickOne {
                picked: Some(*action),
            }
        }
    }

    fn pick_reward(state: &PickOne) -> f64 {
        state.picked.map_or(0.0, |n| n as f64 / 4.0)
    }

    #[test]
    fn test_basic_search() {
        let reward = win_reward(1);
        let config = UctConfig::for_testing();

        let result = run_uct(State::new(), &reward, config, &mut rng(42)).unwrap();

        assert!(result.action.position() < 9);
        assert_eq!(result.iterations, 1000);
        assert_eq!(result.children.len(), 9);
        assert_eq!(
            result.children.iter().map(|c| c.visits).sum::<u32>(),
            1000
        );
        assert!((0.0..=1.0).contains(&result.value));
    }

    #[test]
    fn test_takes_immediate_win() {
        // X: 0, 1   O: 3, 4   X to move, 2 wins
        let state = State::from_board([1, 1, 0, 2, 2, 0, 0, 0, 0], 1);
        let reward = win_reward(1);
        let config = UctConfig::default().with_iterations(2000);

        let result = run_uct(state, &reward, config, &mut rng(7)).unwrap();

        assert_eq!(result.action, Action::Place(2));
        let best = result
            .children
            .iter()
            .map(|c| c.mean_reward)
            .fold(f64::MIN, f64::max);
        assert_eq!(result.value, best);
        assert!((result.value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_blocks_opponent_win() {
        // X: 0, 1   O: 4   O to move, must take 2
        let state = State::from_board([1, 1, 0, 0, 2, 0, 0, 0, 0], 2);
        let reward = win_reward(2);
        let config = UctConfig::default().with_iterations(5000);

        let result = run_uct(state, &reward, config, &mut rng(3)).unwrap();
        assert_eq!(result.action, Action::Place(2));
    }

    #[test]
    fn test_terminal_root_rejected() {
        let state = State::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0], 2);
        let reward = win_reward(2);

        let err = run_uct(state, &reward, UctConfig::for_testing(), &mut rng(0)).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoves));
    }

    #[test]
    fn test_single_action_ignores_budget() {
        let state = State::from_board([1, 2, 1, 1, 2, 2, 2, 1, 0], 1);
        let reward = win_reward(1);
        let config = UctConfig::default().with_iterations(0);

        let result = run_uct(state, &reward, config, &mut rng(0)).unwrap();
        assert_eq!(result.action, Action::Place(8));
        assert_eq!(result.iterations, 1);
        assert_eq!(result.children.len(), 1);
    }

    #[test]
    fn test_zero_budget_is_insufficient() {
        let reward = win_reward(1);
        let config = UctConfig::default().with_iterations(0);

        let err = run_uct(State::new(), &reward, config, &mut rng(0)).unwrap_err();
        assert!(matches!(
            err,
            SearchError::InsufficientBudget { iterations: 0 }
        ));
    }

    #[test]
    fn test_iteration_budget_respected() {
        let reward = win_reward(1);
        let config = UctConfig::default().with_iterations(250);
        let mut search = UctSearch::new(
            State::new(),
            &reward,
            UniformRandom::seeded(1),
            UniformRandom::seeded(2),
            config,
        );

        let result = search.run().unwrap();
        assert_eq!(result.iterations, 250);
        assert_eq!(search.iterations(), 250);
        assert_eq!(search.tree().stats().root_visits, 250);
        // One node per iteration at most, plus the root
        assert!(search.tree().len() <= 251);
    }

    #[test]
    fn test_time_budget_respected() {
        let reward = win_reward(1);
        let limit = Duration::from_millis(20);
        let config = UctConfig::default().with_time_budget(limit);

        let result = run_uct(State::new(), &reward, config, &mut rng(5)).unwrap();
        assert!(result.elapsed >= limit);
        assert!(result.iterations > 0);
        // Budget is checked before each iteration, so the overrun is one
        // tic-tac-toe rollout plus the final pick
        assert!(result.elapsed < limit + Duration::from_millis(50));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let reward = win_reward(1);
        let config = UctConfig::default().with_iterations(500);

        let a = run_uct(State::new(), &reward, config.clone(), &mut rng(99)).unwrap();
        let b = run_uct(State::new(), &reward, config, &mut rng(99)).unwrap();

        assert_eq!(a.action, b.action);
        assert_eq!(a.children, b.children);
    }

    #[test]
    fn test_rejects_reward_out_of_range() {
        let reward = |_: &State| 2.0;
        let err = run_uct(State::new(), &reward, UctConfig::for_testing(), &mut rng(0)).unwrap_err();
        assert!(matches!(err, SearchError::RewardOutOfRange(r) if r == 2.0));

        let reward = |_: &State| f64::NAN;
        let err = run_uct(State::new(), &reward, UctConfig::for_testing(), &mut rng(0)).unwrap_err();
        assert!(matches!(err, SearchError::RewardOutOfRange(_)));
    }

    #[test]
    fn test_rejects_out_of_range_choice() {
        let reward = win_reward(1);
        let mut search = UctSearch::new(
            State::new(),
            &reward,
            |_: &State, _: &[Action]| 99usize,
            UniformRandom::seeded(0),
            UctConfig::for_testing(),
        );

        let err = search.run().unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidChoice {
                index: 99,
                candidates: 9
            }
        ));
    }

    #[test]
    fn test_rollout_depth_cap() {
        let reward = win_reward(1);
        let config = UctConfig::for_testing().with_max_rollout_depth(1);

        let err = run_uct(State::new(), &reward, config, &mut rng(0)).unwrap_err();
        assert!(matches!(err, SearchError::RolloutDepthExceeded(1)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let reward = win_reward(1);
        let config = UctConfig::for_testing().with_exploration(-0.5);

        let err = run_uct(State::new(), &reward, config, &mut rng(0)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_duplicate_moves_expanded_once() {
        let config = UctConfig::default().with_iterations(100);
        let mut search = UctSearch::new(
            PickOne { picked: None },
            &pick_reward,
            UniformRandom::seeded(4),
            UniformRandom::seeded(5),
            config,
        );

        let result = search.run().unwrap();
        assert_eq!(result.action, 4);

        let mut actions: Vec<u8> = result.children.iter().map(|c| c.action).collect();
        assert_eq!(actions.len(), 5);
        actions.sort_unstable();
        actions.dedup();
        assert_eq!(actions.len(), 5);
    }

    #[test]
    fn test_first_chooser_expands_in_order() {
        let config = UctConfig::default().with_iterations(5);
        let mut search = UctSearch::new(
            PickOne { picked: None },
            &pick_reward,
            |_: &PickOne, _: &[u8]| 0usize,
            |_: &PickOne, _: &[u8]| 0usize,
            config,
        );

        search.run().unwrap();
        let tree = search.tree();
        let order: Vec<u8> = tree.tried_actions(tree.root()).copied().collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pass_through_single_player() {
        let config = UctConfig::default()
            .with_iterations(200)
            .with_attribution(Attribution::PassThrough);

        let result = run_uct(PickOne { picked: None }, &pick_reward, config, &mut rng(8)).unwrap();
        assert_eq!(result.action, 4);
        assert!((result.value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_visited_selection() {
        let reward = win_reward(1);
        let config = UctConfig::default()
            .with_iterations(800)
            .with_final_selection(FinalSelection::MostVisited);

        let result = run_uct(State::new(), &reward, config, &mut rng(21)).unwrap();
        let top = result.children.iter().map(|c| c.visits).max().unwrap();
        assert_eq!(result.visits, top);
    }

    #[test]
    fn test_robust_extensions() {
        let reward = win_reward(1);
        let config = UctConfig::default()
            .with_iterations(50)
            .with_robust_extensions(4);

        let mut search = UctSearch::new(
            State::new(),
            &reward,
            UniformRandom::seeded(12),
            UniformRandom::seeded(13),
            config,
        );
        let result = search.run().unwrap();

        assert!(result.extensions <= 4);
        assert_eq!(result.iterations, 50 * (1 + result.extensions));
        if result.extensions < 4 {
            let top = result.children.iter().map(|c| c.visits).max().unwrap();
            assert_eq!(result.visits, top);
        }
    }

    #[test]
    fn test_run_again_grows_tree() {
        let reward = win_reward(1);
        let config = UctConfig::default().with_iterations(100);
        let mut search = UctSearch::new(
            State::new(),
            &reward,
            UniformRandom::seeded(1),
            UniformRandom::seeded(2),
            config,
        );

        search.run().unwrap();
        let second = search.run().unwrap();
        assert_eq!(second.iterations, 100);
        assert_eq!(search.iterations(), 200);
        assert_eq!(search.tree().stats().root_visits, 200);
    }

    #[test]
    fn test_failed_rollout_leaves_tree_usable() {
        let calls = std::cell::Cell::new(0u32);
        let reward = |state: &State| {
            calls.set(calls.get() + 1);
            if calls.get() == 3 {
                2.0
            } else {
                win_reward(1)(state)
            }
        };
        let config = UctConfig::default().with_iterations(100);
        let mut search = UctSearch::new(
            State::new(),
            &reward,
            UniformRandom::seeded(1),
            UniformRandom::seeded(2),
            config,
        );

        let err = search.run().unwrap_err();
        assert!(matches!(err, SearchError::RewardOutOfRange(r) if r == 2.0));
        assert_eq!(search.iterations(), 2);
        assert_eq!(search.tree().len(), 3);
        assert!(search.tree().arena().iter().all(|n| n.visit_count > 0));
        let root = search.tree().get(search.tree().root());
        assert_eq!(root.children.len() + root.untried.len(), 9);

        let result = search.run().unwrap();
        assert_eq!(result.iterations, 100);
        assert_eq!(search.tree().stats().root_visits, 102);
    }

    #[test]
    fn test_visit_tie_counts_as_settled() {
        let reward = win_reward(1);
        let mut search = UctSearch::new(
            State::new(),
            &reward,
            UniformRandom::seeded(0),
            UniformRandom::seeded(0),
            UctConfig::for_testing(),
        );
        let root = search.tree.root();
        let a = search.tree.add_child(root, Action::Place(0)).unwrap();
        let b = search.tree.add_child(root, Action::Place(1)).unwrap();
        for delta in [0.0, 1.0] {
            search.tree.backpropagate(a, delta, Attribution::PassThrough, 1);
        }
        for _ in 0..2 {
            search.tree.backpropagate(b, 1.0, Attribution::PassThrough, 1);
        }

        // b has the best mean and ties a on visits
        assert_eq!(search.tree.best_child(root, 0.0).unwrap(), b);
        assert!(search.root_is_settled().unwrap());

        search.tree.backpropagate(a, 0.0, Attribution::PassThrough, 1);
        assert!(!search.root_is_settled().unwrap());
    }

    #[test]
    fn test_connect4_takes_immediate_win() {
        // Red holds columns 0-2 on the bottom row
        let state = games_connect4::State::from_moves(&[0, 6, 1, 6, 2, 5]);
        let reward = games_connect4::win_reward(1);
        let config = UctConfig::default().with_iterations(3000);

        let result = run_uct(state, &reward, config, &mut rng(17)).unwrap();
        assert_eq!(result.action, games_connect4::Action::Drop(3));
    }
}
