//! Configuration struct definitions.
//!
//! Every field falls back to the embedded defaults when config.toml omits it.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_game() -> String {
    defaults::game().into()
}
fn d_budget() -> String {
    defaults::budget().into()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_attribution() -> String {
    defaults::attribution().into()
}
fn d_final_selection() -> String {
    defaults::final_selection().into()
}
fn d_robust_extensions() -> u32 {
    defaults::robust_extensions()
}
fn d_max_rollout_depth() -> u32 {
    defaults::max_rollout_depth()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_opponent() -> String {
    defaults::opponent().into()
}
fn d_alternate_first() -> bool {
    defaults::alternate_first()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Settings shared by every front end
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Game to play: "tictactoe" or "connect4"
    #[serde(default = "d_game")]
    pub game: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            game: defaults::game().into(),
        }
    }
}

/// UCT search parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// "time" or "iterations"
    #[serde(default = "d_budget")]
    pub budget: String,
    /// Iterations per move when `budget = "iterations"`
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    /// Milliseconds per move when `budget = "time"`
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// "zero_sum" or "pass_through"
    #[serde(default = "d_attribution")]
    pub attribution: String,
    /// "exploitation" or "most_visited"
    #[serde(default = "d_final_selection")]
    pub final_selection: String,
    #[serde(default = "d_robust_extensions")]
    pub robust_extensions: u32,
    /// 0 means unlimited
    #[serde(default = "d_max_rollout_depth")]
    pub max_rollout_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: defaults::budget().into(),
            iterations: defaults::iterations(),
            time_budget_ms: defaults::time_budget_ms(),
            exploration: defaults::exploration(),
            attribution: defaults::attribution().into(),
            final_selection: defaults::final_selection().into(),
            robust_extensions: defaults::robust_extensions(),
            max_rollout_depth: defaults::max_rollout_depth(),
        }
    }
}

/// Match settings for the arena binary
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    #[serde(default = "d_seed")]
    pub seed: u64,
    /// "uct" or "random"
    #[serde(default = "d_opponent")]
    pub opponent: String,
    /// Swap who moves first after every game
    #[serde(default = "d_alternate_first")]
    pub alternate_first: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            seed: defaults::seed(),
            opponent: defaults::opponent().into(),
            alternate_first: defaults::alternate_first(),
        }
    }
}
