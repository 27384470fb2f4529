//! Shared utilities for two-player game implementations
//!
//! Both board games encode the game result the same way, so the mapping from a
//! result to a reward in `[0, 1]` lives here.

/// Winner code for a game still in progress.
pub const ONGOING: u8 = 0;
/// Winner code for a drawn game.
pub const DRAW: u8 = 3;

/// Reward for a finished two-player game, seen from `player`.
///
/// # Arguments
/// * `winner` - Winner indicator: 0=ongoing, 1=player1 wins, 2=player2 wins, 3=draw
/// * `player` - The player the reward is computed for (1 or 2)
///
/// # Returns
/// * `1.0` if `player` won
/// * `0.0` if `player` lost
/// * `0.5` for draws (and for ongoing games, which have no defined reward)
///
/// # Example
/// ```
/// use engine_core::game_utils::outcome_reward;
///
/// // Player 1 wins, viewed from player 1's perspective
/// assert_eq!(outcome_reward(1, 1), 1.0);
///
/// // Player 1 wins, viewed from player 2's perspective
/// assert_eq!(outcome_reward(1, 2), 0.0);
///
/// // Draw
/// assert_eq!(outcome_reward(3, 1), 0.5);
/// ```
#[inline]
pub fn outcome_reward(winner: u8, player: u8) -> f64 {
    match winner {
        1 | 2 if winner == player => 1.0,
        1 | 2 => 0.0,
        _ => 0.5,
    }
}

/// The other seat in a two-player game numbered 1 and 2.
#[inline]
pub fn opponent(player: u8) -> u8 {
    if player == 1 {
        2
    } else {
        1
    }
}

/// Map a cell value to its display symbol.
///
/// `symbols[0]` is used for empty cells, `symbols[1]` and `symbols[2]` for the
/// two players.
#[inline]
pub fn cell_symbol(cell: u8, symbols: [char; 3]) -> char {
    match cell {
        1 => symbols[1],
        2 => symbols[2],
        _ => symbols[0],
    }
}
