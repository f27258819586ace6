//! JSON wire format between the client and the authoritative match server
//!
//! Inbound messages are tagged by `"type"`; the only outbound message is a
//! paddle move.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::sim::{MoveIntent, PaddleInput};

// ============================================================================
// Server to client
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallWire {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleWire {
    pub y: f32,
}

/// Authoritative match snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotWire {
    pub ball: BallWire,
    pub left_paddle: PaddleWire,
    pub right_paddle: PaddleWire,
    pub left_score: i64,
    pub right_score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl SnapshotWire {
    /// Reject snapshots that would corrupt the display state
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let fields = [
            ("ball.x", self.ball.x),
            ("ball.y", self.ball.y),
            ("ball.dx", self.ball.dx),
            ("ball.dy", self.ball.dy),
            ("left_paddle.y", self.left_paddle.y),
            ("right_paddle.y", self.right_paddle.y),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SnapshotError::NonFinite { field, value });
        }
        for (name, score) in [("left_score", self.left_score), ("right_score", self.right_score)] {
            if score < 0 {
                return Err(SnapshotError::NegativeScore { field: name, value: score });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        state: SnapshotWire,
    },
    GameOver {
        #[serde(default)]
        winner: Option<String>,
        /// How the match ended ("points", "aborted", "finished_walkover")
        #[serde(default)]
        by: Option<String>,
    },
    PlayersUpdate {
        #[serde(default)]
        left_player: Option<String>,
        #[serde(default)]
        right_player: Option<String>,
        #[serde(default)]
        left_player_trophies: Option<i64>,
        #[serde(default)]
        right_player_trophies: Option<i64>,
    },
    WaitReady {
        #[serde(default)]
        message: Option<String>,
    },
    PlayersReady {
        left_ready: bool,
        right_ready: bool,
    },
}

const KNOWN_TYPES: [&str; 5] = [
    "game_state",
    "game_over",
    "players_update",
    "wait_ready",
    "players_ready",
];

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message has no \"type\" field")]
    MissingType,

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("non-finite value {value} in {field}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("negative score {value} in {field}")]
    NegativeScore { field: &'static str, value: i64 },
}

/// Decode and validate one inbound text frame
pub fn parse_server_message(raw: &str) -> Result<ServerMessage, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SnapshotError::MissingType)?;
    if !KNOWN_TYPES.contains(&kind) {
        return Err(SnapshotError::UnknownType(kind.to_string()));
    }

    let message: ServerMessage = serde_json::from_value(value)?;
    if let ServerMessage::GameState { state } = &message {
        state.validate()?;
    }
    Ok(message)
}

// ============================================================================
// Client to server
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    Move { direction: Direction },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Direction> for MoveIntent {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => MoveIntent::Up,
            Direction::Down => MoveIntent::Down,
        }
    }
}

/// Moves to send this frame. Up and down are independent, so holding both
/// keys sends both.
pub fn outbound_moves(input: PaddleInput) -> Vec<ClientMessage> {
    let mut moves = Vec::with_capacity(2);
    if input.up {
        moves.push(ClientMessage::Move {
            direction: Direction::Up,
        });
    }
    if input.down {
        moves.push(ClientMessage::Move {
            direction: Direction::Down,
        });
    }
    moves
}
