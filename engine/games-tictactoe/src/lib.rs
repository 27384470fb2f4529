//! TicTacToe game implementation for the UCT engine
//!
//! This crate provides a reference implementation of the `GameState`
//! capability: a 3x3 board where X (player 1) and O (player 2) alternate
//! until one of them has three in a row or the board is full.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameState;
//! use games_tictactoe::{win_reward, Action, State};
//!
//! let state = State::new().apply_action(&Action::Place(4));
//! assert_eq!(state.possible_moves().len(), 8);
//!
//! // Terminal evaluation from X's point of view
//! let reward = win_reward(1);
//! # let _ = reward;
//! ```

use std::fmt;

use engine_core::game_utils::{cell_symbol, opponent, outcome_reward, DRAW, ONGOING};
use engine_core::{GameState, PlayerId};

/// Number of cells on the board
pub const BOARD_SIZE: usize = 9;

/// Winning positions (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// Board representation: 0=empty, 1=X, 2=O
    board: [u8; BOARD_SIZE],
    /// Current player: 1=X, 2=O
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=X, 2=O, 3=draw
    winner: u8,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; BOARD_SIZE],
            current_player: 1, // X goes first
            winner: ONGOING,
        }
    }

    /// Build a state from an arbitrary board and the player to move.
    ///
    /// The winner is derived from the board, so positions set up in tests or
    /// loaded from elsewhere are always consistent.
    pub fn from_board(board: [u8; BOARD_SIZE], current_player: u8) -> Self {
        Self {
            board,
            current_player,
            winner: Self::check_winner(&board),
        }
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != ONGOING
    }

    /// Winner code: 0=ongoing, 1=X, 2=O, 3=draw
    pub fn winner(&self) -> u8 {
        self.winner
    }

    /// Player to move: 1=X, 2=O
    pub fn to_move(&self) -> u8 {
        self.current_player
    }

    /// Cell contents: 0=empty, 1=X, 2=O
    pub fn board(&self) -> &[u8; BOARD_SIZE] {
        &self.board
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..BOARD_SIZE as u8)
            .filter(|&pos| self.board[pos as usize] == 0)
            .collect()
    }

    /// Make a move and return the new state
    pub fn make_move(&self, position: u8) -> State {
        if self.is_done() || position as usize >= BOARD_SIZE || self.board[position as usize] != 0
        {
            return *self; // Invalid move, return unchanged state
        }

        let mut new_state = *self;
        new_state.board[position as usize] = self.current_player;

        // Check for winner
        new_state.winner = Self::check_winner(&new_state.board);

        // Switch player if game not over
        if new_state.winner == ONGOING {
            new_state.current_player = opponent(self.current_player);
        }

        new_state
    }

    /// Check for winner on the board
    fn check_winner(board: &[u8; BOARD_SIZE]) -> u8 {
        for line in &LINES {
            let [a, b, c] = *line;
            if board[a] != 0 && board[a] == board[b] && board[b] == board[c] {
                return board[a]; // Return the winning player
            }
        }

        // Check for draw (board full but no winner)
        if board.iter().all(|&cell| cell != 0) {
            return DRAW;
        }

        ONGOING
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let cells: Vec<String> = (0..3)
                .map(|col| format!(" {} ", cell_symbol(self.board[row * 3 + col], ['.', 'X', 'O'])))
                .collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// TicTacToe action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Place a piece at the given position (0-8, row-major)
    Place(u8),
}

impl Action {
    /// Get the position for this action
    pub fn position(&self) -> u8 {
        match self {
            Action::Place(pos) => *pos,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.position();
        write!(f, "({}, {})", pos / 3, pos % 3)
    }
}

impl GameState for State {
    type Action = Action;

    fn possible_moves(&self) -> Vec<Action> {
        self.legal_moves().into_iter().map(Action::Place).collect()
    }

    fn is_game_over(&self) -> bool {
        self.is_done()
    }

    fn apply_action(&self, action: &Action) -> Self {
        self.make_move(action.position())
    }

    fn current_player(&self) -> PlayerId {
        self.current_player
    }
}

/// Terminal evaluation for `player`: 1.0 win, 0.0 loss, 0.5 draw.
pub fn win_reward(player: u8) -> impl Fn(&State) -> f64 {
    move |state: &State| outcome_reward(state.winner, player)
}

#[cfg(test)]
mod tests;
