//! Call medium, greeting and voice-activity types for call creation.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration::ApiDuration;

/// Output medium for agent messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMedium {
    #[serde(rename = "MESSAGE_MEDIUM_VOICE")]
    Voice,
    #[serde(rename = "MESSAGE_MEDIUM_TEXT")]
    Text,
}

/// Who speaks first in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstSpeaker {
    #[serde(rename = "FIRST_SPEAKER_AGENT")]
    Agent,
    #[serde(rename = "FIRST_SPEAKER_USER")]
    User,
}

/// Behavior after a timed message is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndBehavior {
    #[serde(rename = "END_BEHAVIOR_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "END_BEHAVIOR_HANG_UP_SOFT")]
    HangUpSoft,
    #[serde(rename = "END_BEHAVIOR_HANG_UP_STRICT")]
    HangUpHard,
}

/// A message in a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<OutputMedium>,
}

/// A message delivered after a period of caller inactivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedMessage {
    pub duration: ApiDuration,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_behavior: Option<EndBehavior>,
}

impl TimedMessage {
    pub fn new(duration: Duration, message: impl Into<String>, end_behavior: EndBehavior) -> Self {
        Self {
            duration: duration.into(),
            message: message.into(),
            end_behavior: Some(end_behavior),
        }
    }
}

/// Who speaks first, with greeting details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstSpeakerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserGreeting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentGreeting>,
}

impl FirstSpeakerSettings {
    /// Agent speaks first with the given greeting.
    pub fn agent_first(
        uninterruptible: bool,
        text: impl Into<String>,
        prompt: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            agent: Some(AgentGreeting {
                uninterruptible,
                text: Some(text.into()).filter(|t| !t.is_empty()),
                prompt: Some(prompt.into()).filter(|p| !p.is_empty()),
                delay: Some(delay.into()),
            }),
            user: None,
        }
    }

    /// User speaks first; the agent falls back to a greeting after a delay.
    pub fn user_first(
        fallback_delay: Duration,
        fallback_text: impl Into<String>,
        fallback_prompt: impl Into<String>,
    ) -> Self {
        Self {
            user: Some(UserGreeting {
                fallback: Some(FallbackAgentGreeting {
                    delay: Some(fallback_delay.into()),
                    text: Some(fallback_text.into()).filter(|t| !t.is_empty()),
                    prompt: Some(fallback_prompt.into()).filter(|p| !p.is_empty()),
                }),
            }),
            agent: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGreeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackAgentGreeting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGreeting {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uninterruptible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<ApiDuration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackAgentGreeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Voice activity detection tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VadSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_endpoint_delay: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_turn_duration: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_interruption_duration: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_activation_threshold: Option<f64>,
}

impl VadSettings {
    /// Common defaults for conversational calls.
    pub fn conversational() -> Self {
        Self {
            turn_endpoint_delay: Some(ApiDuration::from_millis(384)),
            minimum_turn_duration: Some(ApiDuration::default()),
            minimum_interruption_duration: Some(ApiDuration::from_millis(90)),
            frame_activation_threshold: Some(0.1),
        }
    }
}

/// The transport used for the call's audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMedium {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_rtc: Option<WebRtcMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio: Option<TwilioMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_web_socket: Option<WebSocketMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telnyx: Option<TelnyxMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plivo: Option<PlivoMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotel: Option<ExotelMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sip: Option<SipMedium>,
}

impl CallMedium {
    /// Server-side WebSocket carrying raw PCM at the given sample rates.
    pub fn server_web_socket(input_sample_rate: u32, output_sample_rate: u32) -> Self {
        Self {
            server_web_socket: Some(WebSocketMedium {
                input_sample_rate,
                output_sample_rate: Some(output_sample_rate),
                client_buffer_size_ms: None,
            }),
            ..Default::default()
        }
    }

    pub fn web_rtc() -> Self {
        Self {
            web_rtc: Some(WebRtcMedium {}),
            ..Default::default()
        }
    }

    pub fn sip_outgoing(
        to: impl Into<String>,
        from: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            sip: Some(SipMedium {
                incoming: None,
                outgoing: Some(SipOutgoing {
                    to: to.into(),
                    from: from.into(),
                    username: Some(username.into()).filter(|u| !u.is_empty()),
                    password: Some(password.into()).filter(|p| !p.is_empty()),
                }),
            }),
            ..Default::default()
        }
    }

    pub fn sip_incoming() -> Self {
        Self {
            sip: Some(SipMedium {
                incoming: Some(SipIncoming {}),
                outgoing: None,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebRtcMedium {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioMedium {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketMedium {
    pub input_sample_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_buffer_size_ms: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelnyxMedium {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlivoMedium {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExotelMedium {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipMedium {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming: Option<SipIncoming>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<SipOutgoing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SipIncoming {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipOutgoing {
    pub to: String,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Settings for an auxiliary data connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConnectionConfig {
    pub websocket_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_config: Option<DataConnectionAudioConfig>,
}

impl DataConnectionConfig {
    pub fn new(websocket_url: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            websocket_url: websocket_url.into(),
            audio_config: Some(DataConnectionAudioConfig {
                sample_rate: Some(sample_rate),
                channel_mode: None,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConnectionAudioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_mode: Option<String>,
}

/// Template substitution context for agent calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_call_transcript: Option<String>,
}

/// String metadata attached to a call.
pub type CallMetadata = HashMap<String, String>;
