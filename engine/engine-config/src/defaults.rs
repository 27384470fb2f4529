//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary and the
//! documented defaults can never drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    game: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    budget: String,
    iterations: u32,
    time_budget_ms: u64,
    exploration: f64,
    attribution: String,
    final_selection: String,
    robust_extensions: u32,
    max_rollout_depth: u32,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    games: u32,
    seed: u64,
    opponent: String,
    alternate_first: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn game() -> &'static str {
    &DEFAULTS.common.game
}

// Search
pub fn budget() -> &'static str {
    &DEFAULTS.search.budget
}
pub fn iterations() -> u32 {
    DEFAULTS.search.iterations
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.search.time_budget_ms
}
pub fn exploration() -> f64 {
    DEFAULTS.search.exploration
}
pub fn attribution() -> &'static str {
    &DEFAULTS.search.attribution
}
pub fn final_selection() -> &'static str {
    &DEFAULTS.search.final_selection
}
pub fn robust_extensions() -> u32 {
    DEFAULTS.search.robust_extensions
}
pub fn max_rollout_depth() -> u32 {
    DEFAULTS.search.max_rollout_depth
}

// Arena
pub fn games() -> u32 {
    DEFAULTS.arena.games
}
pub fn seed() -> u64 {
    DEFAULTS.arena.seed
}
pub fn opponent() -> &'static str {
    &DEFAULTS.arena.opponent
}
pub fn alternate_first() -> bool {
    DEFAULTS.arena.alternate_first
}
