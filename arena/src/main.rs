//! Arena - pits the UCT player against an opponent
//!
//! Loads the central configuration, plays the requested number of games on
//! the chosen board game and prints the final tally.

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

mod config;
mod match_runner;
mod stats;

use crate::config::Config;
use crate::match_runner::run_match;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let uct = config.uct_config()?;
    let opponent = config.opponent()?;
    info!(
        game = %config.game,
        budget = ?uct.budget,
        exploration = uct.exploration,
        attribution = ?uct.attribution,
        "Search configured"
    );

    let stats = match config.game.as_str() {
        "tictactoe" => run_match::<games_tictactoe::State>(
            &uct,
            opponent,
            config.games,
            config.alternate_first,
            config.seed,
        )?,
        "connect4" => run_match::<games_connect4::State>(
            &uct,
            opponent,
            config.games,
            config.alternate_first,
            config.seed,
        )?,
        other => bail!("unknown game '{}'", other),
    };

    stats.log_summary();
    println!("{}", stats);
    Ok(())
}
