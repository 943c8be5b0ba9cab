//! Rock-Paper-Scissors-Plus - a best-of-three rules engine with a single-use bomb
//!
//! This crate provides the game logic a conversational referee sits on top of:
//! - Moves, the beats table and move parsing
//! - Round resolution with a human-readable explanation
//! - Game state with bomb tracking, scoring and game termination
//! - Pluggable opponent strategies with a seedable default
//!
//! # Architecture
//!
//! Each game session owns one [`GameEngine`]. There is no shared global
//! state, so any number of independent games can run side by side. The
//! engine never performs I/O; callers render its structured results.
//!
//! # Modules
//!
//! - [`moves`]: Legal moves, players and the beats table
//! - [`round`]: Round resolution and history records
//! - [`game`]: Game state, move validation and invariants
//! - [`bot`]: Opponent move selection
//! - [`engine`]: The per-session engine tying it together
//! - [`config`]: Engine settings

pub mod bot;
pub mod config;
pub mod engine;
pub mod game;
pub mod moves;
pub mod round;

// Re-export commonly used types
pub use bot::{OpponentStrategy, RandomOpponent, ScriptedOpponent};
pub use config::{ConfigError, GameConfig, DEFAULT_BOMB_PROBABILITY, DEFAULT_MAX_ROUNDS};
pub use engine::{GameAlreadyOver, GameEngine, PlayResult, RoundPlayed, RoundWasted, ValidationResult};
pub use game::{rules_summary, GameResult, GameState, InvariantViolation, MoveError};
pub use moves::{beats_table_is_consistent, Move, Player, UnknownMove};
pub use round::{resolve_round, RoundOutcome, RoundRecord, RoundResult};
