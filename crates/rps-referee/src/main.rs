//! Rock-Paper-Scissors-Plus referee.
//!
//! Reads tool calls as JSON lines on stdin and answers on stdout.

use anyhow::Context;
use rps_core::GameConfig;
use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod host;
mod protocol;
mod session;

use host::SessionHost;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for responses
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = config_from_env()?;
    config.validate()?;

    info!(
        max_rounds = config.max_rounds,
        bomb_probability = config.bomb_probability,
        seeded = config.seed.is_some(),
        "Starting referee..."
    );

    let host = SessionHost::new(config);
    let stdin = io::stdin();
    host::run(&host, stdin.lock(), io::stdout().lock())
}

/// Read overrides from the environment, defaults for anything unset
fn config_from_env() -> anyhow::Result<GameConfig> {
    let mut config = GameConfig::default();

    if let Ok(rounds) = std::env::var("RPS_MAX_ROUNDS") {
        config.max_rounds = rounds
            .parse()
            .with_context(|| format!("RPS_MAX_ROUNDS is not a number: {}", rounds))?;
    }
    if let Ok(p) = std::env::var("RPS_BOMB_PROBABILITY") {
        config.bomb_probability = p
            .parse()
            .with_context(|| format!("RPS_BOMB_PROBABILITY is not a number: {}", p))?;
    }
    if let Ok(seed) = std::env::var("RPS_SEED") {
        config.seed = Some(
            seed.parse()
                .with_context(|| format!("RPS_SEED is not a number: {}", seed))?,
        );
    }

    Ok(config)
}
