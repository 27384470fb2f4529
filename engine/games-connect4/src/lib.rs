//! Connect 4 game implementation for the UCT engine
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::GameState;
//! use games_connect4::{Action, State};
//!
//! let state = State::new().apply_action(&Action::Drop(3));
//! assert_eq!(state.possible_moves().len(), 7);
//! ```

use std::fmt;

use engine_core::game_utils::{cell_symbol, opponent, outcome_reward, DRAW, ONGOING};
use engine_core::{GameState, PlayerId};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Connect4 game state
///
/// Represents the complete state of a Connect4 game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Board representation: 0=empty, 1=Red (player 1), 2=Yellow (player 2)
    /// Stored in row-major order with row 0 at the bottom
    board: [u8; BOARD_SIZE],
    /// Current player: 1=Red, 2=Yellow
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=Red, 2=Yellow, 3=draw
    winner: u8,
    /// Height of each column (0-6 means number of pieces in column)
    column_heights: [u8; COLS],
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; BOARD_SIZE],
            current_player: 1, // Red goes first
            winner: ONGOING,
            column_heights: [0; COLS],
        }
    }

    /// Replay a sequence of column drops from the initial position.
    ///
    /// Drops into full columns or after the game ended are ignored, matching
    /// `drop_piece`.
    pub fn from_moves(columns: &[u8]) -> Self {
        columns
            .iter()
            .fold(Self::new(), |state, &col| state.drop_piece(col))
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != ONGOING
    }

    /// Winner code: 0=ongoing, 1=Red, 2=Yellow, 3=draw
    pub fn winner(&self) -> u8 {
        self.winner
    }

    /// Player to move: 1=Red, 2=Yellow
    pub fn to_move(&self) -> u8 {
        self.current_player
    }

    /// Number of discs dropped so far
    pub fn moves_played(&self) -> usize {
        self.column_heights.iter().map(|&h| h as usize).sum()
    }

    /// Get legal moves (columns that are not full)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..COLS as u8)
            .filter(|&col| self.column_heights[col as usize] < ROWS as u8)
            .collect()
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Drop a piece in the given column and return the new state
    pub fn drop_piece(&self, column: u8) -> State {
        let col = column as usize;

        // Check if move is valid
        if self.is_done() || col >= COLS || self.column_heights[col] >= ROWS as u8 {
            return self.clone(); // Invalid move, return unchanged state
        }

        let mut new_state = self.clone();
        let row = self.column_heights[col] as usize;
        let pos = Self::pos(col, row);

        // Place the piece
        new_state.board[pos] = self.current_player;
        new_state.column_heights[col] += 1;

        // Check for winner
        new_state.winner = new_state.check_winner_at(col, row);

        // Switch player if game not over
        if new_state.winner == ONGOING {
            new_state.current_player = opponent(self.current_player);
        }

        new_state
    }

    /// Check if the piece at (col, row) creates a winning line
    fn check_winner_at(&self, col: usize, row: usize) -> u8 {
        let player = self.board[Self::pos(col, row)];
        if player == 0 {
            return ONGOING;
        }

        // Direction vectors: horizontal, vertical, diagonal /, diagonal \
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dc, dr) in directions {
            let count = 1
                + self.run_length(col, row, dc, dr, player)
                + self.run_length(col, row, -dc, -dr, player);

            if count >= 4 {
                return player;
            }
        }

        // Check for draw (board full but no winner)
        if self.column_heights.iter().all(|&h| h >= ROWS as u8) {
            return DRAW;
        }

        ONGOING
    }

    /// Count consecutive `player` discs from (col, row), exclusive, along (dc, dr).
    fn run_length(&self, col: usize, row: usize, dc: i32, dr: i32, player: u8) -> usize {
        let mut count = 0;
        let (mut c, mut r) = (col as i32 + dc, row as i32 + dr);
        while c >= 0 && c < COLS as i32 && r >= 0 && r < ROWS as i32 {
            if self.board[Self::pos(c as usize, r as usize)] != player {
                break;
            }
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let cell = self.board[Self::pos(col, row)];
                write!(f, "|{}", cell_symbol(cell, ['_', 'R', 'Y']))?;
            }
            writeln!(f, "|")?;
        }
        let labels: Vec<String> = (0..COLS).map(|c| c.to_string()).collect();
        writeln!(f, " {}", labels.join(" "))
    }
}

/// Connect4 action - drop a piece in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop a piece in the given column (0-6)
    Drop(u8),
}

impl Action {
    /// Get the column for this action
    pub fn column(&self) -> u8 {
        match self {
            Action::Drop(col) => *col,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}", self.column())
    }
}

impl GameState for State {
    type Action = Action;

    fn possible_moves(&self) -> Vec<Action> {
        self.legal_moves().into_iter().map(Action::Drop).collect()
    }

    fn is_game_over(&self) -> bool {
        self.is_done()
    }

    fn apply_action(&self, action: &Action) -> Self {
        self.drop_piece(action.column())
    }

    fn current_player(&self) -> PlayerId {
        self.current_player
    }
}

/// Terminal evaluation for `player`: 1.0 win, 0.0 loss, 0.5 draw.
pub fn win_reward(player: u8) -> impl Fn(&State) -> f64 {
    move |state: &State| outcome_reward(state.winner, player)
}
