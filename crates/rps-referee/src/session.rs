//! Game session management.

use rps_core::{ConfigError, GameConfig, GameEngine, GameState, PlayResult};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("Invalid game configuration: {0}")]
    Config(#[from] ConfigError),
}

/// One player's game, with its own engine.
pub struct GameSession {
    pub id: Uuid,
    pub created_at: Instant,
    /// Games started in this session, including the current one
    pub games_started: u32,
    engine: GameEngine,
}

impl GameSession {
    pub fn new(id: Uuid, config: GameConfig) -> Result<Self, SessionError> {
        let config = GameConfig {
            // Each session draws its own opponent sequence
            seed: config.seed.map(|seed| seed ^ id.as_u64_pair().0),
            ..config
        };
        Ok(Self::with_engine(id, GameEngine::from_config(config)?))
    }

    /// Session around an existing engine
    pub fn with_engine(id: Uuid, engine: GameEngine) -> Self {
        Self {
            id,
            created_at: Instant::now(),
            games_started: 1,
            engine,
        }
    }

    pub fn play_round(&mut self, user_move: &str) -> PlayResult {
        self.engine.play_round(user_move)
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn reset(&mut self) -> GameState {
        self.games_started += 1;
        debug!("Session {} starting game {}", self.id, self.games_started);
        self.engine.reset()
    }

    pub fn is_finished(&self) -> bool {
        self.engine.state().is_finished()
    }
}
