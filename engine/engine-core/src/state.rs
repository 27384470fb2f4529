//! The game-state capability the search engine is written against.
//!
//! A game exposes its rules through this trait and nothing else. The engine
//! copies states freely, so implementations should be cheap to clone and must
//! never share mutable data between clones.

use std::fmt::Debug;

/// Identifier of a seat at the table.
///
/// Games number their players however they like; the engine only compares
/// identifiers for equality.
pub type PlayerId = u8;

/// Main trait for game implementations
///
/// # Example
///
/// ```rust
/// use engine_core::GameState;
///
/// /// Players alternately take one or two sticks; whoever takes the last one wins.
/// #[derive(Debug, Clone)]
/// struct Nim {
///     sticks: u8,
///     to_move: u8,
/// }
///
/// impl GameState for Nim {
///     type Action = u8;
///
///     fn possible_moves(&self) -> Vec<u8> {
///         (1..=2).filter(|&n| n <= self.sticks).collect()
///     }
///
///     fn is_game_over(&self) -> bool {
///         self.sticks == 0
///     }
///
///     fn apply_action(&self, take: &u8) -> Self {
///         Nim {
///             sticks: self.sticks - take,
///             to_move: 1 - self.to_move,
///         }
///     }
///
///     fn current_player(&self) -> u8 {
///         self.to_move
///     }
/// }
///
/// let start = Nim { sticks: 3, to_move: 0 };
/// let next = start.apply_action(&2);
/// assert_eq!(start.sticks, 3);
/// assert_eq!(next.possible_moves(), vec![1]);
/// ```
pub trait GameState: Clone + Debug {
    /// Action type - should be small and cheap to clone
    type Action: Clone + PartialEq + Debug;

    /// Legal actions from this state.
    ///
    /// An empty vector is allowed and means the state is terminal (a finished
    /// game or a stalemate).
    fn possible_moves(&self) -> Vec<Self::Action>;

    /// True exactly when no further turns can be taken.
    fn is_game_over(&self) -> bool;

    /// Apply an action and return the resulting state.
    ///
    /// Must not modify `self`. The returned value is an independent copy; the
    /// search tree relies on no two states sharing mutable data.
    fn apply_action(&self, action: &Self::Action) -> Self;

    /// The player whose turn it is.
    ///
    /// Only used to attribute rewards to the player who made each move. Games
    /// without a notion of turns can keep the default, which makes every move
    /// belong to the same player.
    fn current_player(&self) -> PlayerId {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counter that ends at a fixed target, alternating between two players.
    #[derive(Debug, Clone, PartialEq)]
    struct Countdown {
        remaining: u32,
        player: PlayerId,
    }

    impl GameState for Countdown {
        type Action = u32;

        fn possible_moves(&self) -> Vec<u32> {
            (1..=self.remaining.min(3)).collect()
        }

        fn is_game_over(&self) -> bool {
            self.remaining == 0
        }

        fn apply_action(&self, action: &u32) -> Self {
            Countdown {
                remaining: self.remaining - action,
                player: 1 - self.player,
            }
        }

        fn current_player(&self) -> PlayerId {
            self.player
        }
    }

    #[derive(Debug, Clone)]
    struct Solitaire(u8);

    impl GameState for Solitaire {
        type Action = ();

        fn possible_moves(&self) -> Vec<()> {
            if self.0 > 0 {
                vec![()]
            } else {
                Vec::new()
            }
        }

        fn is_game_over(&self) -> bool {
            self.0 == 0
        }

        fn apply_action(&self, _action: &()) -> Self {
            Solitaire(self.0 - 1)
        }
    }

    #[test]
    fn test_apply_action_leaves_original_untouched() {
        let start = Countdown {
            remaining: 5,
            player: 0,
        };
        let next = start.apply_action(&2);

        assert_eq!(start.remaining, 5);
        assert_eq!(start.player, 0);
        assert_eq!(next.remaining, 3);
        assert_eq!(next.current_player(), 1);
    }

    #[test]
    fn test_terminal_state_has_no_moves() {
        let done = Countdown {
            remaining: 0,
            player: 1,
        };
        assert!(done.is_game_over());
        assert!(done.possible_moves().is_empty());
    }

    #[test]
    fn test_default_current_player() {
        let game = Solitaire(2);
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.apply_action(&()).current_player(), 0);
    }
}
