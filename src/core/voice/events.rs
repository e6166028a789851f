//! Typed control events parsed from the voice session's text frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{BridgeError, BridgeResult};

/// Who produced a transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    #[default]
    User,
    Agent,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeakerRole::User => write!(f, "user"),
            SpeakerRole::Agent => write!(f, "agent"),
            SpeakerRole::Unknown => write!(f, "unknown"),
        }
    }
}

/// Speech-to-text progress for one utterance. `text` is cumulative; `delta`
/// carries only the newest increment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    #[serde(default)]
    pub role: SpeakerRole,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub delta: String,
}

/// An error reported by the voice service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    #[serde(default)]
    pub error: String,
}

/// A call-state change reported by the voice service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateEvent {
    #[serde(default)]
    pub state: String,
}

/// A control message read from the voice session.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Transcript(TranscriptEvent),
    Error(ErrorEvent),
    State(StateEvent),
    /// Recognizable message of a kind this bridge does not handle.
    Unknown { kind: String },
}

impl ControlEvent {
    /// Parse a raw text frame.
    ///
    /// A frame that is not JSON, or whose `type` field is missing or not a
    /// string, is [`BridgeError::MalformedControlMessage`]. A frame with an
    /// unhandled kind parses to [`ControlEvent::Unknown`].
    pub fn parse(raw: &str) -> BridgeResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| BridgeError::MalformedControlMessage(e.to_string()))?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BridgeError::MalformedControlMessage("missing message kind".to_string())
            })?
            .to_string();

        let event = match kind.as_str() {
            "transcript" => ControlEvent::Transcript(
                serde_json::from_value(value)
                    .map_err(|e| BridgeError::MalformedControlMessage(e.to_string()))?,
            ),
            "error" => ControlEvent::Error(
                serde_json::from_value(value)
                    .map_err(|e| BridgeError::MalformedControlMessage(e.to_string()))?,
            ),
            "state" => ControlEvent::State(
                serde_json::from_value(value)
                    .map_err(|e| BridgeError::MalformedControlMessage(e.to_string()))?,
            ),
            _ => ControlEvent::Unknown { kind },
        };
        Ok(event)
    }

    /// The wire-level message kind.
    pub fn kind(&self) -> &str {
        match self {
            ControlEvent::Transcript(_) => "transcript",
            ControlEvent::Error(_) => "error",
            ControlEvent::State(_) => "state",
            ControlEvent::Unknown { kind } => kind,
        }
    }
}
