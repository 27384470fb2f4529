//! Monte Carlo Tree Search with UCB1 selection (UCT).
//!
//! This crate provides a game-agnostic UCT implementation that works with any
//! game implementing the `engine-core` [`GameState`](engine_core::GameState)
//! trait, scored by a [`RewardFn`](engine_core::RewardFn).
//!
//! # Overview
//!
//! UCT grows a search tree one node per iteration. Each iteration has four
//! phases:
//!
//! 1. **Selection**: Descend through fully expanded nodes, picking the child
//!    with the highest UCB1 score
//! 2. **Expansion**: Add one child for an untried action of the first node
//!    that still has one
//! 3. **Simulation**: Play random moves from a copy of the new node's state
//!    until the game ends and score the result in `[0, 1]`
//! 4. **Backpropagation**: Update visit counts and reward sums along the path
//!    from the new node to the root
//!
//! When the budget runs out, the root child with the best mean reward is
//! recommended.
//!
//! # Usage
//!
//! ```rust
//! use mcts::{run_uct, UctConfig};
//! use games_tictactoe::{win_reward, State};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let state = State::new();
//! let reward = win_reward(state.to_move());
//! let config = UctConfig::default().with_iterations(500);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_uct(state, &reward, config, &mut rng).unwrap();
//!
//! println!("Best action: {}", result.action);
//! println!("Value: {:.3}", result.value);
//! ```
//!
//! # Configuration
//!
//! The [`UctConfig`] struct controls search behavior:
//!
//! - `budget`: wall-clock time (default 1.5 s) or an iteration count
//! - `exploration`: UCB1 coefficient (default 1/sqrt(2))
//! - `attribution`: how rewards are credited to each player's moves
//! - `final_selection`: best mean reward (default) or most visits
//! - `robust_extensions`: extra rounds while those two picks disagree
//! - `max_rollout_depth`: optional cap on rollout length
//!
//! # Choosers
//!
//! Expansion and rollout each take an [`ActionChooser`]. [`UniformRandom`]
//! is the default; any `FnMut(&S, &[S::Action]) -> usize` closure works too.

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{Attribution, Budget, FinalSelection, UctConfig, DEFAULT_EXPLORATION};
pub use node::{NodeId, UctNode};
pub use policy::{ActionChooser, UniformRandom};
pub use search::{run_uct, ChildStats, SearchError, SearchResult, UctSearch};
pub use tree::{TreeStats, UctTree};
