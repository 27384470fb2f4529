//! Core traits for games searched by the UCT engine
//!
//! This crate defines the only boundary between the search engine and a game:
//! - `GameState`: legal moves, game-over detection and pure action application
//! - `RewardFn`: evaluation of a terminal state from the searcher's perspective
//! - `game_utils`: helpers shared by the two-player board games

pub mod game_utils;
pub mod reward;
pub mod state;

// Re-export main types for convenience
pub use reward::RewardFn;
pub use state::{GameState, PlayerId};
