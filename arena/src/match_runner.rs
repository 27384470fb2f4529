//! Plays games between two agents.

use std::fmt::Display;

use anyhow::{Context, Result};
use engine_core::game_utils::{opponent, outcome_reward, DRAW, ONGOING};
use engine_core::{GameState, PlayerId};
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{run_uct, UctConfig};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::config::Opponent;
use crate::stats::{MatchStats, Outcome};

/// A two-player board game the arena can referee.
pub trait ArenaGame: GameState + Display {
    const NAME: &'static str;

    fn new_game() -> Self;

    /// Winner code: 0 ongoing, 1 or 2 for the winning seat, 3 draw.
    fn winner(&self) -> u8;
}

impl ArenaGame for games_tictactoe::State {
    const NAME: &'static str = "tictactoe";

    fn new_game() -> Self {
        Self::new()
    }

    fn winner(&self) -> u8 {
        games_tictactoe::State::winner(self)
    }
}

impl ArenaGame for games_connect4::State {
    const NAME: &'static str = "connect4";

    fn new_game() -> Self {
        Self::new()
    }

    fn winner(&self) -> u8 {
        games_connect4::State::winner(self)
    }
}

/// Something that picks moves.
#[derive(Debug, Clone)]
pub enum Agent {
    Uct(UctConfig),
    Random,
}

impl Agent {
    fn select<G: ArenaGame>(&self, state: &G, rng: &mut ChaCha20Rng) -> Result<G::Action> {
        match self {
            Agent::Uct(config) => {
                let player = state.current_player();
                let reward = move |s: &G| outcome_reward(s.winner(), player);
                let result = run_uct(state.clone(), &reward, config.clone(), rng)?;
                debug!(
                    iterations = result.iterations,
                    value = result.value,
                    visits = result.visits,
                    "UCT move chosen"
                );
                Ok(result.action)
            }
            Agent::Random => state
                .possible_moves()
                .choose(rng)
                .cloned()
                .context("random agent found no legal moves"),
        }
    }
}

/// Finished game summary.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Winner code (1, 2 or 3 for a draw)
    pub winner: u8,
    pub moves: u32,
}

/// Play one game from the standard starting position.
///
/// `seats[0]` plays for the player who moves first.
pub fn play_game<G: ArenaGame>(seats: [&Agent; 2], rng: &mut ChaCha20Rng) -> Result<GameRecord> {
    let mut state = G::new_game();
    let first: PlayerId = state.current_player();
    let mut moves = 0u32;

    while !state.is_game_over() && !state.possible_moves().is_empty() {
        let seat = if state.current_player() == first { 0 } else { 1 };
        let action = seats[seat].select(&state, rng)?;
        debug!(player = state.current_player(), ?action, "Move");
        state = state.apply_action(&action);
        moves += 1;
    }

    debug!("Final position:\n{}", state);

    let winner = match state.winner() {
        ONGOING => DRAW,
        w => w,
    };
    Ok(GameRecord { winner, moves })
}

/// Play a full match of `games` games between a UCT player and `opponent`.
pub fn run_match<G: ArenaGame>(
    uct: &UctConfig,
    opponent_kind: Opponent,
    games: u32,
    alternate_first: bool,
    seed: u64,
) -> Result<MatchStats> {
    let hero = Agent::Uct(uct.clone());
    let villain = match opponent_kind {
        Opponent::Uct => Agent::Uct(uct.clone()),
        Opponent::Random => Agent::Random,
    };

    info!(
        game = G::NAME,
        games,
        opponent = ?opponent_kind,
        alternate_first,
        seed,
        "Starting match"
    );

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut stats = MatchStats::new();
    let first_seat = G::new_game().current_player();

    // Progress bar only when stderr is a TTY
    let progress = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        let pb = ProgressBar::new(games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")
                .context("invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for game in 0..games {
        let hero_first = !alternate_first || game % 2 == 0;
        let (seats, hero_seat) = if hero_first {
            ([&hero, &villain], first_seat)
        } else {
            ([&villain, &hero], opponent(first_seat))
        };

        let record = play_game::<G>(seats, &mut rng)
            .with_context(|| format!("game {} failed", game + 1))?;

        let outcome = if record.winner == hero_seat {
            Outcome::Win
        } else if record.winner == DRAW {
            Outcome::Draw
        } else {
            Outcome::Loss
        };
        stats.record(outcome, hero_first, record.moves);

        let log = || {
            info!(
                game = game + 1,
                ?outcome,
                uct_first = hero_first,
                moves = record.moves,
                "Game finished"
            )
        };
        match progress {
            Some(ref pb) => {
                pb.suspend(log);
                pb.inc(1);
            }
            None => log(),
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    Ok(stats)
}
