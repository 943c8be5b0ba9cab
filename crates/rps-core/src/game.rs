//! Core game state machine.
//!
//! This module contains the `GameState` aggregate, the rules for validating
//! moves against it and the two ways a round can consume it: resolved or
//! wasted.

use crate::moves::{Move, Player};
use crate::round::{RoundOutcome, RoundRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Final result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    UserWins,
    OpponentWins,
    Draw,
}

impl GameResult {
    /// Higher score wins, equal scores draw
    pub fn from_scores(user_score: u32, opponent_score: u32) -> Self {
        use std::cmp::Ordering;
        match user_score.cmp(&opponent_score) {
            Ordering::Greater => GameResult::UserWins,
            Ordering::Less => GameResult::OpponentWins,
            Ordering::Equal => GameResult::Draw,
        }
    }
}

/// Reasons a move is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("Game is already over. Start a new game to play again.")]
    GameOver,

    #[error("Invalid move '{0}'. Valid moves are: rock, paper, scissors, bomb.")]
    UnknownMove(String),

    #[error("{} already used the bomb this game. Choose rock, paper, or scissors.", bomb_owner(.0))]
    BombAlreadyUsed(Player),
}

fn bomb_owner(player: &Player) -> &'static str {
    match player {
        Player::User => "You have",
        Player::Opponent => "Opponent has",
    }
}

/// A broken state invariant, reported by [`GameState::check_invariants`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Round {current} is past the limit of {max} rounds")]
    RoundOutOfRange { current: u32, max: u32 },

    #[error("Game result and game over flag disagree")]
    ResultMismatch,

    #[error("Expected {expected} history entries, found {found}")]
    HistoryLength { expected: usize, found: usize },

    #[error("Scores {user}-{opponent} do not match round outcomes in history")]
    ScoreMismatch { user: u32, opponent: u32 },

    #[error("Bomb flag for {0:?} does not match moves in history")]
    BombFlagMismatch(Player),

    #[error("Final result does not follow from the scores")]
    WrongResult,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Round about to be played (starts at 1)
    pub current_round: u32,
    pub max_rounds: u32,
    pub user_score: u32,
    pub opponent_score: u32,
    pub user_bomb_used: bool,
    pub opponent_bomb_used: bool,
    pub game_over: bool,
    /// Set exactly when `game_over` is
    pub game_result: Option<GameResult>,
    /// One record per consumed round, oldest first
    pub history: Vec<RoundRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ROUNDS)
    }
}

impl GameState {
    /// Create a fresh game
    pub fn new(max_rounds: u32) -> Self {
        Self {
            current_round: 1,
            max_rounds,
            user_score: 0,
            opponent_score: 0,
            user_bomb_used: false,
            opponent_bomb_used: false,
            game_over: false,
            game_result: None,
            history: Vec::new(),
        }
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.game_over
    }

    /// Whether `player` has already thrown their bomb
    pub fn bomb_used(&self, player: Player) -> bool {
        match player {
            Player::User => self.user_bomb_used,
            Player::Opponent => self.opponent_bomb_used,
        }
    }

    /// Resolved rounds that ended level
    pub fn draws(&self) -> u32 {
        self.count_outcomes(RoundOutcome::Draw)
    }

    /// Rounds wasted on rejected moves
    pub fn wasted_rounds(&self) -> u32 {
        self.count_outcomes(RoundOutcome::Invalid)
    }

    fn count_outcomes(&self, outcome: RoundOutcome) -> u32 {
        self.history.iter().filter(|r| r.outcome == outcome).count() as u32
    }

    /// Check a move for `player` against the current state.
    ///
    /// Does not modify anything.
    pub fn validate_move(&self, input: &str, player: Player) -> Result<Move, MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }

        let mv: Move = input
            .parse()
            .map_err(|_| MoveError::UnknownMove(input.to_string()))?;

        if mv == Move::Bomb && self.bomb_used(player) {
            return Err(MoveError::BombAlreadyUsed(player));
        }

        Ok(mv)
    }

    /// Apply a resolved round: bomb flags, score, history, then advance or finish.
    pub fn record_round(
        &mut self,
        user_input: &str,
        user: Move,
        opponent: Move,
        outcome: RoundOutcome,
    ) {
        if user == Move::Bomb {
            self.user_bomb_used = true;
        }
        if opponent == Move::Bomb {
            self.opponent_bomb_used = true;
        }

        match outcome {
            RoundOutcome::User => self.user_score += 1,
            RoundOutcome::Opponent => self.opponent_score += 1,
            RoundOutcome::Draw | RoundOutcome::Invalid => {}
        }

        self.history.push(RoundRecord::played(
            self.current_round,
            user_input,
            user,
            opponent,
            outcome,
        ));

        if self.current_round >= self.max_rounds {
            self.finish();
        } else {
            self.current_round += 1;
        }
    }

    /// Consume the current round for a rejected move. Scores and bomb flags are untouched.
    ///
    /// Returns the round number that was wasted.
    pub fn waste_round(&mut self, user_input: &str, reason: &str) -> u32 {
        let round = self.current_round;
        self.history
            .push(RoundRecord::wasted(round, user_input, reason));
        self.current_round += 1;

        if self.current_round > self.max_rounds {
            self.finish();
        }
        round
    }

    fn finish(&mut self) {
        self.game_over = true;
        self.game_result = Some(GameResult::from_scores(
            self.user_score,
            self.opponent_score,
        ));
    }

    /// Verify every state invariant, reporting the first one broken
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.current_round > self.max_rounds.saturating_add(1) {
            return Err(InvariantViolation::RoundOutOfRange {
                current: self.current_round,
                max: self.max_rounds,
            });
        }

        if self.game_over != self.game_result.is_some() {
            return Err(InvariantViolation::ResultMismatch);
        }

        let expected = if self.game_over {
            self.max_rounds as usize
        } else {
            self.current_round.saturating_sub(1) as usize
        };
        if self.history.len() != expected {
            return Err(InvariantViolation::HistoryLength {
                expected,
                found: self.history.len(),
            });
        }

        if self.user_score != self.count_outcomes(RoundOutcome::User)
            || self.opponent_score != self.count_outcomes(RoundOutcome::Opponent)
        {
            return Err(InvariantViolation::ScoreMismatch {
                user: self.user_score,
                opponent: self.opponent_score,
            });
        }

        let user_bombed = self.history.iter().any(|r| r.user_move == Some(Move::Bomb));
        if user_bombed != self.user_bomb_used {
            return Err(InvariantViolation::BombFlagMismatch(Player::User));
        }
        let opponent_bombed = self
            .history
            .iter()
            .any(|r| r.opponent_move == Some(Move::Bomb));
        if opponent_bombed != self.opponent_bomb_used {
            return Err(InvariantViolation::BombFlagMismatch(Player::Opponent));
        }

        if let Some(result) = self.game_result {
            if result != GameResult::from_scores(self.user_score, self.opponent_score) {
                return Err(InvariantViolation::WrongResult);
            }
        }

        Ok(())
    }
}

/// Short rule text for the referee to read out when a game starts
pub fn rules_summary(max_rounds: u32) -> String {
    format!(
        "Best of {max_rounds} rounds: whoever wins more rounds wins the game.\n\
         Valid moves: rock, paper, scissors, bomb.\n\
         Rock beats scissors, scissors beats paper, paper beats rock.\n\
         Bomb beats everything except another bomb (bomb vs bomb is a draw).\n\
         Each player can use the bomb only once per game; an invalid move wastes the round."
    )
}
