//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rounds in a standard game
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Chance the default opponent throws its bomb while it still has one
pub const DEFAULT_BOMB_PROBABILITY: f64 = 0.2;

/// Errors for configuration values the engine cannot run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("A game needs at least one round")]
    NoRounds,

    #[error("Bomb probability must be between 0 and 1, got {0}")]
    InvalidBombProbability(f64),
}

/// Settings for a single engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds per game
    pub max_rounds: u32,
    /// Bomb chance for the default random opponent
    pub bomb_probability: f64,
    /// Seed for the default random opponent, entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            bomb_probability: DEFAULT_BOMB_PROBABILITY,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default config with a fixed opponent seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if !(0.0..=1.0).contains(&self.bomb_probability) {
            return Err(ConfigError::InvalidBombProbability(self.bomb_probability));
        }
        Ok(())
    }
}
