//! The game engine: one owned game plus the opponent that plays it.
//!
//! `GameEngine` is the entry point an agent layer talks to. Every operation
//! returns a structured value, rejected moves included, so the caller can
//! render a complete turn without re-deriving anything from the state.
//! Mutating operations take `&mut self`; a host that shares an engine
//! across threads must put it behind a lock.

use crate::bot::{OpponentStrategy, RandomOpponent};
use crate::config::{ConfigError, GameConfig};
use crate::game::{rules_summary, GameResult, GameState, MoveError};
use crate::moves::{normalize, Move, Player};
use crate::round::{resolve_round, RoundOutcome, RoundResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of checking a move without playing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: String,
    /// Trimmed, lowercased input
    pub normalized_move: String,
    /// Parsed move, present when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Move>,
}

/// A round that resolved normally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPlayed {
    pub round: u32,
    pub user_move: Move,
    pub opponent_move: Move,
    pub outcome: RoundOutcome,
    pub explanation: String,
    pub user_score: u32,
    pub opponent_score: u32,
    pub game_over: bool,
    pub game_result: Option<GameResult>,
    /// Absent once the game has ended
    pub next_round: Option<u32>,
}

/// A round consumed by a rejected move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundWasted {
    pub reason: String,
    pub round: u32,
    pub round_wasted: bool,
    /// Round counter after the waste
    pub current_round: u32,
    pub game_over: bool,
    pub game_result: Option<GameResult>,
    pub user_score: u32,
    pub opponent_score: u32,
}

/// Returned when a round is requested after the game has finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAlreadyOver {
    pub reason: String,
    pub final_result: Option<GameResult>,
    pub user_score: u32,
    pub opponent_score: u32,
}

/// Everything `play_round` can report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayResult {
    Played(RoundPlayed),
    Wasted(RoundWasted),
    GameAlreadyOver(GameAlreadyOver),
}

impl PlayResult {
    /// Only a resolved round counts as success
    pub fn is_success(&self) -> bool {
        matches!(self, PlayResult::Played(_))
    }

    /// Failure reason, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            PlayResult::Played(_) => None,
            PlayResult::Wasted(w) => Some(&w.reason),
            PlayResult::GameAlreadyOver(o) => Some(&o.reason),
        }
    }

    pub fn scores(&self) -> (u32, u32) {
        match self {
            PlayResult::Played(p) => (p.user_score, p.opponent_score),
            PlayResult::Wasted(w) => (w.user_score, w.opponent_score),
            PlayResult::GameAlreadyOver(o) => (o.user_score, o.opponent_score),
        }
    }

    pub fn game_over(&self) -> bool {
        match self {
            PlayResult::Played(p) => p.game_over,
            PlayResult::Wasted(w) => w.game_over,
            PlayResult::GameAlreadyOver(_) => true,
        }
    }
}

/// Owns a single game and its opponent
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    opponent: Box<dyn OpponentStrategy>,
}

impl GameEngine {
    /// Best-of-three engine with the default random opponent
    pub fn new() -> Self {
        let config = GameConfig::default();
        let opponent = RandomOpponent::new(config.bomb_probability);
        Self::with_parts(config, Box::new(opponent))
    }

    /// Engine built from a validated config, random opponent seeded from it
    pub fn from_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let opponent = match config.seed {
            Some(seed) => RandomOpponent::with_seed(config.bomb_probability, seed),
            None => RandomOpponent::new(config.bomb_probability),
        };
        Ok(Self::with_parts(config, Box::new(opponent)))
    }

    /// Default rules against a caller-supplied opponent
    pub fn with_opponent(opponent: impl OpponentStrategy + 'static) -> Self {
        Self::with_parts(GameConfig::default(), Box::new(opponent))
    }

    fn with_parts(config: GameConfig, opponent: Box<dyn OpponentStrategy>) -> Self {
        Self {
            state: GameState::new(config.max_rounds),
            config,
            opponent,
        }
    }

    /// Replace the opponent; the game in progress is kept
    pub fn set_opponent(&mut self, opponent: impl OpponentStrategy + 'static) {
        self.opponent = Box::new(opponent);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Independent copy of the current state
    pub fn state(&self) -> GameState {
        self.state.clone()
    }

    /// Rule text for the configured round count
    pub fn rules(&self) -> String {
        rules_summary(self.config.max_rounds)
    }

    /// Start a new game, discarding the current one
    pub fn reset(&mut self) -> GameState {
        self.state = GameState::new(self.config.max_rounds);
        info!(max_rounds = self.config.max_rounds, "Game reset");
        self.state.clone()
    }

    /// Check a move without playing it
    pub fn validate_move(&self, input: &str, player: Player) -> ValidationResult {
        let normalized_move = normalize(input);
        match self.state.validate_move(input, player) {
            Ok(mv) => ValidationResult {
                valid: true,
                reason: "Valid move.".to_string(),
                normalized_move,
                parsed: Some(mv),
            },
            Err(e) => ValidationResult {
                valid: false,
                reason: e.to_string(),
                normalized_move,
                parsed: None,
            },
        }
    }

    /// Ask the opponent strategy for this round's move.
    ///
    /// A spent bomb is replaced with rock.
    pub fn choose_opponent_move(&mut self) -> Move {
        let mv = self.opponent.choose_move(&self.state);
        if mv == Move::Bomb && self.state.opponent_bomb_used {
            warn!(
                round = self.state.current_round,
                "Opponent strategy chose a spent bomb, playing rock instead"
            );
            return Move::Rock;
        }
        mv
    }

    /// Resolve two moves without touching the game
    pub fn resolve_round(&self, user: Move, opponent: Move) -> RoundResult {
        resolve_round(user, opponent)
    }

    /// Apply a resolved round to the game and return the new state.
    ///
    /// A finished game is returned unchanged.
    pub fn update_state(&mut self, user: Move, opponent: Move, outcome: RoundOutcome) -> GameState {
        if self.state.game_over {
            warn!("Ignoring round update for a finished game");
        } else {
            self.apply(user.as_str(), user, opponent, outcome);
        }
        self.state.clone()
    }

    fn apply(&mut self, user_input: &str, user: Move, opponent: Move, outcome: RoundOutcome) {
        self.state.record_round(user_input, user, opponent, outcome);
        self.after_mutation();
    }

    fn after_mutation(&self) {
        debug_assert_eq!(self.state.check_invariants(), Ok(()));
        if let Some(result) = self.state.game_result {
            info!(
                ?result,
                user_score = self.state.user_score,
                opponent_score = self.state.opponent_score,
                "Game finished"
            );
        }
    }

    /// Play one round with the user's raw move text
    pub fn play_round(&mut self, input: &str) -> PlayResult {
        if self.state.game_over {
            return PlayResult::GameAlreadyOver(GameAlreadyOver {
                reason: MoveError::GameOver.to_string(),
                final_result: self.state.game_result,
                user_score: self.state.user_score,
                opponent_score: self.state.opponent_score,
            });
        }

        let user_move = match self.state.validate_move(input, Player::User) {
            Ok(mv) => mv,
            Err(e) => return self.waste_round(input, e),
        };

        let round = self.state.current_round;
        let opponent_move = self.choose_opponent_move();
        let RoundResult {
            outcome,
            explanation,
        } = resolve_round(user_move, opponent_move);

        debug!(round, %user_move, %opponent_move, ?outcome, "Round resolved");
        self.apply(input, user_move, opponent_move, outcome);

        let state = &self.state;
        PlayResult::Played(RoundPlayed {
            round,
            user_move,
            opponent_move,
            outcome,
            explanation,
            user_score: state.user_score,
            opponent_score: state.opponent_score,
            game_over: state.game_over,
            game_result: state.game_result,
            next_round: (!state.game_over).then_some(state.current_round),
        })
    }

    fn waste_round(&mut self, input: &str, error: MoveError) -> PlayResult {
        let reason = error.to_string();
        let round = self.state.waste_round(input, &reason);
        debug!(round, input, %reason, "Round wasted");
        self.after_mutation();

        let state = &self.state;
        PlayResult::Wasted(RoundWasted {
            reason,
            round,
            round_wasted: true,
            current_round: state.current_round,
            game_over: state.game_over,
            game_result: state.game_result,
            user_score: state.user_score,
            opponent_score: state.opponent_score,
        })
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
