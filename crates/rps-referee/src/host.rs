//! Session host and the request loop.

use crate::protocol::{ToolCall, ToolResponse};
use crate::session::{GameSession, SessionError};
use dashmap::DashMap;
use rps_core::{rules_summary, GameConfig};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Host state shared across all sessions.
pub struct SessionHost {
    /// Settings every new session is created with
    pub config: GameConfig,
    /// All active sessions
    pub sessions: DashMap<Uuid, GameSession>,
}

impl SessionHost {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    /// Open a session and return its ID.
    pub fn create_session(&self) -> Result<Uuid, SessionError> {
        let session_id = Uuid::new_v4();
        let session = GameSession::new(session_id, self.config.clone())?;
        self.sessions.insert(session_id, session);
        info!("Session {} created", session_id);
        Ok(session_id)
    }

    /// Handle a single tool call.
    pub fn handle_call(&self, call: ToolCall) -> ToolResponse {
        match self.dispatch(call) {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed: {}", e);
                ToolResponse::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    fn dispatch(&self, call: ToolCall) -> Result<ToolResponse, SessionError> {
        match call {
            ToolCall::NewSession => {
                let session_id = self.create_session()?;
                let state = self.session_state(session_id)?;
                Ok(ToolResponse::SessionCreated { session_id, state })
            }

            ToolCall::PlayRound {
                session_id,
                user_move,
            } => {
                let mut session = self
                    .sessions
                    .get_mut(&session_id)
                    .ok_or(SessionError::NotFound(session_id))?;
                let result = session.play_round(&user_move);
                match result.error() {
                    None => debug!(%session_id, "Round played"),
                    Some(reason) => debug!(%session_id, reason, "Round not played"),
                }
                if result.is_success() && session.is_finished() {
                    info!("Session {} finished game {}", session_id, session.games_started);
                }
                Ok(ToolResponse::RoundPlayed { session_id, result })
            }

            ToolCall::GetGameState { session_id } => {
                let state = self.session_state(session_id)?;
                Ok(ToolResponse::GameState { session_id, state })
            }

            ToolCall::ResetGameState { session_id } => {
                let mut session = self
                    .sessions
                    .get_mut(&session_id)
                    .ok_or(SessionError::NotFound(session_id))?;
                let state = session.reset();
                Ok(ToolResponse::GameReset { session_id, state })
            }

            ToolCall::EndSession { session_id } => {
                let (_, session) = self
                    .sessions
                    .remove(&session_id)
                    .ok_or(SessionError::NotFound(session_id))?;
                info!(
                    "Session {} ended after {} game(s), open for {:?}",
                    session_id,
                    session.games_started,
                    session.created_at.elapsed()
                );
                Ok(ToolResponse::SessionEnded { session_id })
            }

            ToolCall::Rules => Ok(ToolResponse::Rules {
                text: rules_summary(self.config.max_rounds),
            }),

            ToolCall::Ping => Ok(ToolResponse::Pong),
        }
    }

    fn session_state(&self, session_id: Uuid) -> Result<rps_core::GameState, SessionError> {
        self.sessions
            .get(&session_id)
            .map(|s| s.state())
            .ok_or(SessionError::NotFound(session_id))
    }

    /// Handle one raw request line.
    pub fn handle_line(&self, line: &str) -> ToolResponse {
        match serde_json::from_str::<ToolCall>(line) {
            Ok(call) => self.handle_call(call),
            Err(e) => {
                warn!("Invalid request: {}: {}", e, line);
                ToolResponse::Error {
                    message: format!("Invalid request: {}", e),
                }
            }
        }
    }
}

/// Serve requests from `input` until it closes, one response line per request line.
///
/// A line that is not valid UTF-8 gets an error response; the loop keeps going.
pub fn run<R: BufRead, W: Write>(
    host: &SessionHost,
    mut input: R,
    mut output: W,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => host.handle_line(line.trim_end_matches(['\r', '\n'])),
            Err(e) => {
                warn!("Request is not valid UTF-8: {}", e);
                ToolResponse::Error {
                    message: format!("Invalid request: {}", e),
                }
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }

    info!("Input closed, {} session(s) still open", host.sessions.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn host() -> SessionHost {
        SessionHost::new(GameConfig::seeded(5))
    }

    fn call(host: &SessionHost, request: Value) -> Value {
        let response = host.handle_line(&request.to_string());
        serde_json::to_value(response).unwrap()
    }

    fn open_session(host: &SessionHost) -> String {
        let created = call(host, json!({"type": "new_session"}));
        assert_eq!(created["type"], "session_created");
        created["payload"]["session_id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_play_round_through_host() {
        let host = host();
        let id = open_session(&host);

        let response = call(
            &host,
            json!({"type": "play_round", "payload": {"session_id": id, "user_move": "rock"}}),
        );
        assert_eq!(response["type"], "round_played");
        assert_eq!(response["payload"]["result"]["status"], "played");
        assert_eq!(response["payload"]["result"]["round"], 1);

        let state = call(
            &host,
            json!({"type": "get_game_state", "payload": {"session_id": id}}),
        );
        assert_eq!(state["payload"]["state"]["current_round"], 2);
        assert_eq!(state["payload"]["state"]["history"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_move_reported_as_wasted() {
        let host = host();
        let id = open_session(&host);

        let response = call(
            &host,
            json!({"type": "play_round", "payload": {"session_id": id, "user_move": "lizard"}}),
        );
        let result = &response["payload"]["result"];
        assert_eq!(result["status"], "wasted");
        assert_eq!(result["round_wasted"], true);
        assert_eq!(result["current_round"], 2);
    }

    #[test]
    fn test_sessions_are_independent() {
        let host = host();
        let a = open_session(&host);
        let b = open_session(&host);

        call(
            &host,
            json!({"type": "play_round", "payload": {"session_id": a, "user_move": "paper"}}),
        );
        let state_b = call(
            &host,
            json!({"type": "get_game_state", "payload": {"session_id": b}}),
        );
        assert_eq!(state_b["payload"]["state"]["current_round"], 1);
    }

    #[test]
    fn test_reset_and_end_session() {
        let host = host();
        let id = open_session(&host);
        call(
            &host,
            json!({"type": "play_round", "payload": {"session_id": id, "user_move": "bomb"}}),
        );

        let reset = call(
            &host,
            json!({"type": "reset_game_state", "payload": {"session_id": id}}),
        );
        assert_eq!(reset["type"], "game_reset");
        assert_eq!(reset["payload"]["state"]["user_bomb_used"], false);

        let ended = call(&host, json!({"type": "end_session", "payload": {"session_id": id}}));
        assert_eq!(ended["type"], "session_ended");
        assert!(host.sessions.is_empty());

        let missing = call(
            &host,
            json!({"type": "get_game_state", "payload": {"session_id": id}}),
        );
        assert_eq!(missing["type"], "error");
    }

    #[test]
    fn test_malformed_line_gets_error_response() {
        let host = host();
        let response = call(&host, json!({"type": "launch_rockets"}));
        assert_eq!(response["type"], "error");
        assert!(response["payload"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request"));
    }

    #[test]
    fn test_run_writes_one_line_per_request() {
        let host = host();
        let input = "{\"type\":\"ping\"}\n\n{\"type\":\"rules\"}\nnot json\n";
        let mut output = Vec::new();

        run(&host, input.as_bytes(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "pong");
        assert_eq!(lines[1]["type"], "rules");
        assert!(lines[1]["payload"]["text"]
            .as_str()
            .unwrap()
            .starts_with("Best of 3 rounds"));
        assert_eq!(lines[2]["type"], "error");
    }

    #[test]
    fn test_run_survives_non_utf8_line() {
        let host = host();
        let mut input = b"{\"type\":\"ping\"}\n".to_vec();
        input.extend_from_slice(b"\xff\xfe\n");
        input.extend_from_slice(b"{\"type\":\"ping\"}");
        let mut output = Vec::new();

        run(&host, input.as_slice(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "pong");
        assert_eq!(lines[1]["type"], "error");
        assert_eq!(lines[2]["type"], "pong");
    }
}
