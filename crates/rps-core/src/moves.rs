//! Moves, players and the beats table.
//!
//! This module contains:
//! - The closed set of legal moves, including the single-use bomb
//! - The directional beats table and its consistency check
//! - Parsing of free-form move text into a `Move`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A move a player can throw in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    /// Beats every classic move, usable once per game per player
    Bomb,
}

impl Move {
    /// All legal moves
    pub const ALL: [Move; 4] = [Move::Rock, Move::Paper, Move::Scissors, Move::Bomb];

    /// The three classic moves that can be played every round
    pub const CLASSIC: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Lowercase token used in input and explanations
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
            Move::Bomb => "bomb",
        }
    }

    /// Moves this one beats
    pub fn beats(&self) -> &'static [Move] {
        match self {
            Move::Rock => &[Move::Scissors],
            Move::Paper => &[Move::Rock],
            Move::Scissors => &[Move::Paper],
            Move::Bomb => &[Move::Rock, Move::Paper, Move::Scissors],
        }
    }

    /// Whether this move beats `other`
    pub fn defeats(&self, other: Move) -> bool {
        self.beats().contains(&other)
    }

    /// Capitalized token, for the start of an explanation sentence
    pub(crate) fn capitalized(&self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
            Move::Bomb => "Bomb",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a legal move
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown move '{0}'")]
pub struct UnknownMove(pub String);

impl FromStr for Move {
    type Err = UnknownMove;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            "bomb" => Ok(Move::Bomb),
            _ => Err(UnknownMove(s.to_string())),
        }
    }
}

/// Trim and lowercase raw move text
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// The two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    User,
    Opponent,
}

/// Every unordered pair of distinct moves must have exactly one winner.
///
/// Round resolution only looks the user's move up in the table, so a pair
/// that is beaten both ways (or neither way) would silently favour one side.
pub fn beats_table_is_consistent() -> bool {
    Move::ALL.iter().enumerate().all(|(i, a)| {
        Move::ALL[i + 1..]
            .iter()
            .all(|b| a.defeats(*b) != b.defeats(*a))
    }) && Move::ALL.iter().all(|m| !m.defeats(*m))
}
