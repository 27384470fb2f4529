//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "UCT_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the UCT_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// A missing or malformed file falls back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    let parsed: Result<CentralConfig, String> = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => apply_env_overrides(config),
        Err(e) => {
            warn!("Failed to load {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, bool)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: UCT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "UCT_COMMON_LOG_LEVEL");
    env_override!(config, common.game, "UCT_COMMON_GAME");

    // Search
    env_override!(config, search.budget, "UCT_SEARCH_BUDGET");
    env_override!(config, search.iterations, "UCT_SEARCH_ITERATIONS", parse);
    env_override!(
        config,
        search.time_budget_ms,
        "UCT_SEARCH_TIME_BUDGET_MS",
        parse
    );
    env_override!(config, search.exploration, "UCT_SEARCH_EXPLORATION", parse);
    env_override!(config, search.attribution, "UCT_SEARCH_ATTRIBUTION");
    env_override!(config, search.final_selection, "UCT_SEARCH_FINAL_SELECTION");
    env_override!(
        config,
        search.robust_extensions,
        "UCT_SEARCH_ROBUST_EXTENSIONS",
        parse
    );
    env_override!(
        config,
        search.max_rollout_depth,
        "UCT_SEARCH_MAX_ROLLOUT_DEPTH",
        parse
    );

    // Arena
    env_override!(config, arena.games, "UCT_ARENA_GAMES", parse);
    env_override!(config, arena.seed, "UCT_ARENA_SEED", parse);
    env_override!(config, arena.opponent, "UCT_ARENA_OPPONENT");
    env_override!(
        config,
        arena.alternate_first,
        "UCT_ARENA_ALTERNATE_FIRST",
        parse
    );

    config
}
