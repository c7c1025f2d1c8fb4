//! Wire types for the game WebSocket.
//!
//! Every frame is one JSON object. Outbound events are tagged with `"type"`.

use derive_more::{Display, Error};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strictly_connect4::Player;
use tracing::instrument;

/// Event sent from the server to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    /// Tokens for a freshly created session, sent to its creator only.
    Init {
        /// Token granting the second seat.
        join: String,
        /// Token granting spectator access.
        watch: String,
    },
    /// An accepted move, broadcast live or replayed to late joiners.
    Play {
        /// Who played.
        player: Player,
        /// Column played.
        column: usize,
        /// Row the disc landed in.
        row: usize,
    },
    /// The game was won. Follows the winning `play` event.
    Win {
        /// The winner.
        player: Player,
    },
    /// A failure reported to the requesting connection only.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl ServerEvent {
    /// Creates an error event from anything displayable.
    pub fn error(reason: impl std::fmt::Display) -> Self {
        ServerEvent::Error {
            message: reason.to_string(),
        }
    }
}

/// How a connection asked to enter, decided by its first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opening {
    /// No `join` or `watch` key: start a new session.
    Create,
    /// `join` key present; `None` when it is not a string.
    Join(Option<String>),
    /// `watch` key present; `None` when it is not a string.
    Watch(Option<String>),
}

impl Opening {
    /// Classifies the first frame of a connection.
    ///
    /// `join` takes precedence over `watch` when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the frame is not a JSON object.
    #[instrument(skip(text))]
    pub fn classify(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ProtocolError::new(format!("Malformed message: {}", e)))?;
        let Value::Object(fields) = value else {
            return Err(ProtocolError::new("Expected a JSON object."));
        };

        let token = |key: &str| fields.get(key).map(|v| v.as_str().map(str::to_owned));
        if let Some(join) = token("join") {
            Ok(Opening::Join(join))
        } else if let Some(watch) = token("watch") {
            Ok(Opening::Watch(watch))
        } else {
            Ok(Opening::Create)
        }
    }
}

/// Gameplay request from a seated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientRequest {
    /// Drop a disc into `column`. Range is checked by the engine.
    Play {
        /// Target column.
        #[serde(deserialize_with = "column_index")]
        column: i64,
    },
}

/// Reads a column as any JSON integer.
///
/// Integers beyond `i64` saturate, so the engine still reports them as out of
/// range instead of the frame being treated as malformed.
fn column_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(column) = number.as_i64() {
        return Ok(column);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    // Integer literals too large for u64 are parsed as floats.
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() >= i64::MAX as f64 => {
            Ok(if f < 0.0 { i64::MIN } else { i64::MAX })
        }
        _ => {
            let message = format!("invalid column {}, expected an integer", number);
            Err(de::Error::custom(message))
        }
    }
}

impl ClientRequest {
    /// Parses a gameplay frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] for invalid JSON, an unknown `type` or a
    /// missing or non-integer `column`.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text)
            .map_err(|e| ProtocolError::new(format!("Malformed message: {}", e)))
    }
}

/// Inbound frame that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{}", message)]
pub struct ProtocolError {
    /// What was wrong with the frame.
    pub message: String,
}

impl ProtocolError {
    /// Creates a new protocol error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
