//! Match tally.
//!
//! Results are kept from the UCT player's point of view, which is the player
//! under test in every match.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::info;

/// How a single game ended for the UCT player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Running totals over a match.
#[derive(Debug)]
pub struct MatchStats {
    wins: u32,
    losses: u32,
    draws: u32,
    /// Wins while moving first
    first_mover_wins: u32,
    total_moves: u64,
    start_time: Instant,
}

impl MatchStats {
    pub fn new() -> Self {
        Self {
            wins: 0,
            losses: 0,
            draws: 0,
            first_mover_wins: 0,
            total_moves: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a completed game.
    pub fn record(&mut self, outcome: Outcome, moved_first: bool, moves: u32) {
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                if moved_first {
                    self.first_mover_wins += 1;
                }
            }
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
        self.total_moves += moves as u64;
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Match score with draws counted as half a win.
    pub fn score(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / games as f64
    }

    pub fn avg_game_length(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            0.0
        } else {
            self.total_moves as f64 / games as f64
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log the match summary.
    pub fn log_summary(&self) {
        info!(
            games = self.games(),
            wins = self.wins,
            losses = self.losses,
            draws = self.draws,
            first_mover_wins = self.first_mover_wins,
            score = format!("{:.3}", self.score()),
            avg_moves = format!("{:.1}", self.avg_game_length()),
            elapsed_secs = format!("{:.1}", self.elapsed().as_secs_f64()),
            "Match complete"
        );
    }
}

impl Default for MatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UCT: {} wins, {} losses, {} draws over {} games (score {:.3})",
            self.wins,
            self.losses,
            self.draws,
            self.games(),
            self.score()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = MatchStats::new();
        assert_eq!(stats.games(), 0);
        assert_eq!(stats.score(), 0.0);
        assert_eq!(stats.avg_game_length(), 0.0);
    }

    #[test]
    fn test_record_outcomes() {
        let mut stats = MatchStats::new();
        stats.record(Outcome::Win, true, 5);
        stats.record(Outcome::Win, false, 7);
        stats.record(Outcome::Loss, true, 6);
        stats.record(Outcome::Draw, false, 9);

        assert_eq!(stats.games(), 4);
        assert_eq!(stats.wins(), 2);
        assert_eq!(stats.losses(), 1);
        assert_eq!(stats.draws(), 1);
        assert_eq!(stats.first_mover_wins, 1);
        assert!((stats.score() - 0.625).abs() < 1e-12);
        assert!((stats.avg_game_length() - 6.75).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let mut stats = MatchStats::new();
        stats.record(Outcome::Draw, true, 9);
        assert_eq!(
            stats.to_string(),
            "UCT: 0 wins, 0 losses, 1 draws over 1 games (score 0.500)"
        );
    }
}
