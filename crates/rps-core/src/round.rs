//! Round resolution and the per-round history record.
//!
//! This module defines how two moves resolve into an outcome and the
//! immutable record each played (or wasted) round leaves behind.

use crate::moves::Move;
use serde::{Deserialize, Serialize};

/// Who took a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    User,
    Opponent,
    Draw,
    /// The user's move was rejected and the round was wasted
    Invalid,
}

/// Outcome of resolving two moves, with a sentence naming both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub outcome: RoundOutcome,
    pub explanation: String,
}

/// Resolve a round between two already-validated moves.
///
/// Equal moves draw, bomb against bomb included. Otherwise the user wins
/// when the opponent's move is in the user's beats list, and loses in every
/// other case.
pub fn resolve_round(user: Move, opponent: Move) -> RoundResult {
    if user == opponent {
        RoundResult {
            outcome: RoundOutcome::Draw,
            explanation: format!("Both played {}. It's a draw!", user),
        }
    } else if user.defeats(opponent) {
        RoundResult {
            outcome: RoundOutcome::User,
            explanation: format!(
                "{} beats {}. You win this round!",
                user.capitalized(),
                opponent
            ),
        }
    } else {
        RoundResult {
            outcome: RoundOutcome::Opponent,
            explanation: format!(
                "{} beats {}. Opponent wins this round!",
                opponent.capitalized(),
                user
            ),
        }
    }
}

/// One entry of the game history. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round this record consumed (1-indexed)
    pub round_number: u32,
    /// Text the user sent, as received
    pub user_input: String,
    /// Parsed user move, absent when the input was rejected
    pub user_move: Option<Move>,
    /// Absent on a wasted round, no opponent move is generated
    pub opponent_move: Option<Move>,
    pub outcome: RoundOutcome,
    pub invalid_reason: Option<String>,
}

impl RoundRecord {
    /// Record for a resolved round
    pub fn played(
        round_number: u32,
        user_input: impl Into<String>,
        user_move: Move,
        opponent_move: Move,
        outcome: RoundOutcome,
    ) -> Self {
        Self {
            round_number,
            user_input: user_input.into(),
            user_move: Some(user_move),
            opponent_move: Some(opponent_move),
            outcome,
            invalid_reason: None,
        }
    }

    /// Record for a round wasted by a rejected move
    pub fn wasted(round_number: u32, user_input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            round_number,
            user_input: user_input.into(),
            user_move: None,
            opponent_move: None,
            outcome: RoundOutcome::Invalid,
            invalid_reason: Some(reason.into()),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.outcome == RoundOutcome::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_move_is_a_draw() {
        for m in Move::ALL {
            assert_eq!(resolve_round(m, m).outcome, RoundOutcome::Draw);
        }
    }

    #[test]
    fn test_rock_beats_scissors() {
        let result = resolve_round(Move::Rock, Move::Scissors);
        assert_eq!(result.outcome, RoundOutcome::User);
        assert_eq!(result.explanation, "Rock beats scissors. You win this round!");
    }

    #[test]
    fn test_opponent_wins_explanation_names_both_moves() {
        let result = resolve_round(Move::Rock, Move::Paper);
        assert_eq!(result.outcome, RoundOutcome::Opponent);
        assert_eq!(
            result.explanation,
            "Paper beats rock. Opponent wins this round!"
        );
    }

    #[test]
    fn test_bomb_against_bomb() {
        let result = resolve_round(Move::Bomb, Move::Bomb);
        assert_eq!(result.outcome, RoundOutcome::Draw);
        assert_eq!(result.explanation, "Both played bomb. It's a draw!");
    }

    #[test]
    fn test_resolution_is_antisymmetric() {
        for a in Move::ALL {
            for b in Move::ALL {
                if a == b {
                    continue;
                }
                let forward = resolve_round(a, b).outcome;
                let backward = resolve_round(b, a).outcome;
                match forward {
                    RoundOutcome::User => assert_eq!(backward, RoundOutcome::Opponent),
                    RoundOutcome::Opponent => assert_eq!(backward, RoundOutcome::User),
                    other => panic!("{} vs {} resolved to {:?}", a, b, other),
                }
            }
        }
    }

    #[test]
    fn test_wasted_record_keeps_raw_input() {
        let record = RoundRecord::wasted(2, "Lizard ", "bad move");
        assert!(record.is_invalid());
        assert_eq!(record.user_input, "Lizard ");
        assert_eq!(record.user_move, None);
        assert_eq!(record.opponent_move, None);
    }
}
