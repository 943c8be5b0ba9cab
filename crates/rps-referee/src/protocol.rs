//! Line-delimited JSON protocol between the agent layer and the referee.

use rps_core::{GameState, PlayResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tool calls sent by the agent layer, one per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ToolCall {
    /// Open a new game session
    NewSession,

    /// Play a round with the user's move text
    PlayRound { session_id: Uuid, user_move: String },

    /// Inspect a session without advancing it
    GetGameState { session_id: Uuid },

    /// Start a new game in an existing session
    ResetGameState { session_id: Uuid },

    /// Close a session
    EndSession { session_id: Uuid },

    /// Request the rule text to explain at game start
    Rules,

    /// Keepalive
    Ping,
}

/// Responses written back, one per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ToolResponse {
    /// Session opened with a fresh game
    SessionCreated { session_id: Uuid, state: GameState },

    /// Outcome of a play_round call, successful or not
    RoundPlayed { session_id: Uuid, result: PlayResult },

    /// Current state snapshot
    GameState { session_id: Uuid, state: GameState },

    /// Game restarted
    GameReset { session_id: Uuid, state: GameState },

    /// Session closed
    SessionEnded { session_id: Uuid },

    /// Rule text
    Rules { text: String },

    /// Pong response
    Pong,

    /// Request could not be handled
    Error { message: String },
}
