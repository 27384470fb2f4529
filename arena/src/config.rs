//! Configuration for the arena binary
//!
//! Defaults come from the central config.toml (with its UCT_* environment
//! overrides); CLI arguments take highest priority.

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use mcts::{Attribution, Budget, FinalSelection, UctConfig};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_game() -> String {
    CENTRAL_CONFIG.common.game.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.arena.games
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.arena.seed
}

fn default_opponent() -> String {
    CENTRAL_CONFIG.arena.opponent.clone()
}

fn default_alternate_first() -> bool {
    CENTRAL_CONFIG.arena.alternate_first
}

fn default_budget() -> String {
    CENTRAL_CONFIG.search.budget.clone()
}

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.search.iterations
}

fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.search.time_budget_ms
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.search.exploration
}

fn default_attribution() -> String {
    CENTRAL_CONFIG.search.attribution.clone()
}

fn default_final_selection() -> String {
    CENTRAL_CONFIG.search.final_selection.clone()
}

fn default_robust_extensions() -> u32 {
    CENTRAL_CONFIG.search.robust_extensions
}

fn default_max_rollout_depth() -> u32 {
    CENTRAL_CONFIG.search.max_rollout_depth
}

/// Who the UCT player faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    Uct,
    Random,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "arena")]
#[command(about = "Play UCT against another player and report the results")]
#[command(
    long_about = "Plays a series of games between a UCT player and either a second UCT
player or a uniform random mover, then prints wins, losses and draws.

Defaults are loaded from config.toml with UCT_<SECTION>_<KEY> environment
overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Game to play (tictactoe, connect4)
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Seed for every random decision in the match
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Opponent of the UCT player (uct, random)
    #[arg(long, default_value_t = default_opponent())]
    pub opponent: String,

    /// Swap who moves first after every game
    #[arg(long, default_value_t = default_alternate_first(), action = clap::ArgAction::Set)]
    pub alternate_first: bool,

    /// Search budget kind (time, iterations)
    #[arg(long, default_value_t = default_budget())]
    pub budget: String,

    /// Iterations per move when budget is "iterations"
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// Milliseconds per move when budget is "time"
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// UCB1 exploration coefficient
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Reward attribution (zero_sum, pass_through)
    #[arg(long, default_value_t = default_attribution())]
    pub attribution: String,

    /// Final move selection (exploitation, most_visited)
    #[arg(long, default_value_t = default_final_selection())]
    pub final_selection: String,

    /// Extra search rounds while the best and most visited moves differ
    #[arg(long, default_value_t = default_robust_extensions())]
    pub robust_extensions: u32,

    /// Abort rollouts longer than this many moves (0 to disable)
    #[arg(long, default_value_t = default_max_rollout_depth())]
    pub max_rollout_depth: u32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.game.as_str(), "tictactoe" | "connect4") {
            return Err(anyhow!(
                "unknown game '{}', expected tictactoe or connect4",
                self.game
            ));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.opponent()?;
        self.uct_config()?;

        Ok(())
    }

    pub fn opponent(&self) -> Result<Opponent> {
        match self.opponent.as_str() {
            "uct" => Ok(Opponent::Uct),
            "random" => Ok(Opponent::Random),
            other => Err(anyhow!(
                "unknown opponent '{}', expected uct or random",
                other
            )),
        }
    }

    /// Build the search configuration used by every UCT player.
    pub fn uct_config(&self) -> Result<UctConfig> {
        let budget = match self.budget.as_str() {
            "iterations" => Budget::Iterations(self.iterations),
            "time" => Budget::Time(Duration::from_millis(self.time_budget_ms)),
            other => {
                return Err(anyhow!(
                    "unknown budget '{}', expected time or iterations",
                    other
                ))
            }
        };

        let attribution = match self.attribution.as_str() {
            "zero_sum" => Attribution::ZeroSum,
            "pass_through" => Attribution::PassThrough,
            other => {
                return Err(anyhow!(
                    "unknown attribution '{}', expected zero_sum or pass_through",
                    other
                ))
            }
        };

        let final_selection = match self.final_selection.as_str() {
            "exploitation" => FinalSelection::Exploitation,
            "most_visited" => FinalSelection::MostVisited,
            other => {
                return Err(anyhow!(
                    "unknown final selection '{}', expected exploitation or most_visited",
                    other
                ))
            }
        };

        let mut config = UctConfig::default()
            .with_budget(budget)
            .with_exploration(self.exploration)
            .with_attribution(attribution)
            .with_final_selection(final_selection)
            .with_robust_extensions(self.robust_extensions);
        if self.max_rollout_depth > 0 {
            config = config.with_max_rollout_depth(self.max_rollout_depth);
        }

        config.validate()?;
        Ok(config)
    }
}
