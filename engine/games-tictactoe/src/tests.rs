use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[test]
fn test_initial_state() {
    let state = State::new();
    assert_eq!(state.board, [0; 9]);
    assert_eq!(state.current_player, 1);
    assert_eq!(state.winner, 0);
    assert!(!state.is_done());
    assert!(!state.is_game_over());
}

#[test]
fn test_legal_moves() {
    let state = State::new();
    let legal = state.legal_moves();
    assert_eq!(legal, (0..9).collect::<Vec<_>>());

    // After one move
    let state = state.make_move(4); // Center
    let legal = state.legal_moves();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&4));
}

#[test]
fn test_possible_moves_match_legal_moves() {
    let state = State::new().make_move(0).make_move(8);
    let actions = state.possible_moves();
    let positions: Vec<u8> = actions.iter().map(Action::position).collect();
    assert_eq!(positions, state.legal_moves());
}

#[test]
fn test_make_move() {
    let state = State::new();
    let new_state = state.make_move(4); // X places in center

    assert_eq!(new_state.board[4], 1);
    assert_eq!(new_state.current_player, 2); // Now O's turn
    assert!(!new_state.is_done());
}

#[test]
fn test_apply_action_is_pure() {
    let state = State::new();
    let next = state.apply_action(&Action::Place(4));

    assert_eq!(state, State::new());
    assert_eq!(next.board[4], 1);
    assert_eq!(next.current_player(), 2);
}

#[test]
fn test_invalid_move() {
    let state = State::new();
    let state_with_move = state.make_move(4);

    // Try to place in same position
    let invalid_state = state_with_move.make_move(4);
    assert_eq!(invalid_state, state_with_move); // Should be unchanged
}

#[test]
fn test_winning_game() {
    let mut state = State::new();

    // X wins with top row
    state = state.make_move(0); // X
    state = state.make_move(3); // O
    state = state.make_move(1); // X
    state = state.make_move(4); // O
    state = state.make_move(2); // X wins

    assert_eq!(state.winner(), 1);
    assert!(state.is_game_over());
    assert!(state.possible_moves().is_empty());
}

#[test]
fn test_from_board_detects_draw() {
    // Board: X O X / O X X / O X O
    let state = State::from_board([1, 2, 1, 2, 1, 1, 2, 1, 2], 1);
    assert_eq!(state.winner(), 3);
    assert!(state.is_game_over());
}

#[test]
fn test_all_winning_lines() {
    assert_eq!(LINES.len(), 8, "Should have 8 winning lines");

    for (line_idx, line) in LINES.iter().enumerate() {
        // Test X wins on this line
        let mut board_x = [0u8; 9];
        for &pos in line {
            board_x[pos] = 1;
        }
        assert_eq!(
            State::check_winner(&board_x),
            1,
            "X should win on line {}: {:?}",
            line_idx,
            line
        );

        // Test O wins on this line
        let mut board_o = [0u8; 9];
        for &pos in line {
            board_o[pos] = 2;
        }
        assert_eq!(
            State::check_winner(&board_o),
            2,
            "O should win on line {}: {:?}",
            line_idx,
            line
        );
    }
}

/// Draw detection: full board with no winner
#[test]
fn test_draw_detection_comprehensive() {
    let draw_boards = [
        [1, 2, 1, 1, 2, 2, 2, 1, 1], // X O X / X O O / O X X
        [1, 2, 1, 2, 1, 1, 2, 1, 2], // X O X / O X X / O X O
        [2, 1, 2, 2, 1, 1, 1, 2, 2], // O X O / O X X / X O O
    ];

    for board in &draw_boards {
        let state = State::from_board(*board, 1);
        assert_eq!(state.winner(), 3, "Should detect draw for board {:?}", board);
        assert!(state.is_done());
        assert!(state.legal_moves().is_empty());
    }
}

#[test]
fn test_win_reward() {
    let x_wins = State::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0], 2);
    let draw = State::from_board([1, 2, 1, 2, 1, 1, 2, 1, 2], 1);

    assert_eq!(win_reward(1)(&x_wins), 1.0);
    assert_eq!(win_reward(2)(&x_wins), 0.0);
    assert_eq!(win_reward(1)(&draw), 0.5);
    assert_eq!(win_reward(2)(&draw), 0.5);
}

/// No moves allowed on finished game
#[test]
fn test_no_moves_after_game_over() {
    let state = State::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0], 2);

    assert!(state.is_done());
    assert!(state.legal_moves().is_empty());

    // Attempting a move should return unchanged state
    let new_state = state.make_move(5);
    assert_eq!(new_state, state);
}

#[test]
fn test_display() {
    let state = State::new().make_move(0).make_move(4);
    let rendered = state.to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], " X | . | . ");
    assert_eq!(lines[2], " . | O | . ");
    assert_eq!(Action::Place(5).to_string(), "(1, 2)");
}

/// Play many random games and verify invariants hold
#[test]
fn test_random_games_invariants() {
    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = State::new();
        let mut move_count = 0;

        while !state.is_game_over() {
            let legal = state.possible_moves();
            assert!(
                !legal.is_empty(),
                "Non-done game must have legal moves (seed={}, moves={})",
                seed,
                move_count
            );

            let action = legal[rng.gen_range(0..legal.len())];
            let prev_player = state.current_player();
            state = state.apply_action(&action);
            move_count += 1;

            if !state.is_game_over() {
                assert_ne!(
                    state.current_player(),
                    prev_player,
                    "Player should switch after move (seed={})",
                    seed
                );
            }
        }

        assert!(move_count <= 9, "Game should finish within 9 moves");
        assert_ne!(state.winner(), 0, "Done game must have winner (seed={})", seed);
        assert!(state.possible_moves().is_empty());
    }
}
