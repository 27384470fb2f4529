//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared by
//! the search engine's front ends (currently the `arena` binary).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`UCT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! UCT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     UCT_COMMON_GAME=connect4
//!     UCT_COMMON_LOG_LEVEL=debug
//!     UCT_SEARCH_BUDGET=iterations
//!     UCT_SEARCH_ITERATIONS=20000
//!     UCT_ARENA_GAMES=100
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
