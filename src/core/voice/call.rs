//! Call creation request and response models.

use serde::{Deserialize, Serialize};

use super::duration::ApiDuration;
use super::media::{
    CallMedium, CallMetadata, ConversationMessage, DataConnectionConfig, FirstSpeaker,
    FirstSpeakerSettings, OutputMedium, TemplateContext, TimedMessage, VadSettings,
};
use super::tools::SelectedTool;
use super::voices::ExternalVoice;

/// Request body for creating a call.
///
/// Everything is optional on the wire; the service applies its own defaults
/// for omitted fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_voice: Option<ExternalVoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_messages: Vec<ConversationMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_timeout: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_exceeded_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inactivity_messages: Vec<TimedMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_tools: Vec<SelectedTool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<CallMedium>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recording_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_speaker: Option<FirstSpeaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_output_medium: Option<OutputMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_speaker_settings: Option<FirstSpeakerSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vad_settings: Option<VadSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental_settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CallMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_connection: Option<DataConnectionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_context: Option<TemplateContext>,

    /// Continue from a prior call. Sent as a query parameter, not in the body.
    #[serde(skip)]
    pub prior_call_id: Option<String>,
    /// Ask the service to generate a greeting prompt. Query parameter.
    #[serde(skip)]
    pub enable_greeting_prompt: bool,
    /// Create the call against an agent-scoped endpoint.
    #[serde(skip)]
    pub agent_id: Option<String>,
}

impl CallRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn medium(mut self, medium: CallMedium) -> Self {
        self.medium = Some(medium);
        self
    }

    pub fn max_duration(mut self, duration: ApiDuration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    pub fn join_timeout(mut self, timeout: ApiDuration) -> Self {
        self.join_timeout = Some(timeout);
        self
    }

    pub fn first_speaker_settings(mut self, settings: FirstSpeakerSettings) -> Self {
        self.first_speaker_settings = Some(settings);
        self
    }

    pub fn vad_settings(mut self, settings: VadSettings) -> Self {
        self.vad_settings = Some(settings);
        self
    }

    pub fn inactivity_messages(mut self, messages: Vec<TimedMessage>) -> Self {
        self.inactivity_messages = messages;
        self
    }

    pub fn recording_enabled(mut self, enabled: bool) -> Self {
        self.recording_enabled = enabled;
        self
    }

    pub fn agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn prior_call(mut self, call_id: impl Into<String>) -> Self {
        self.prior_call_id = Some(call_id.into());
        self
    }
}

/// Response from a call creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    #[serde(default)]
    pub call_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
    #[serde(default)]
    pub join_url: String,
    #[serde(default)]
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<String>,
    #[serde(default)]
    pub max_duration: Option<ApiDuration>,
    #[serde(default)]
    pub join_timeout: Option<ApiDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_speaker: Option<FirstSpeaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_speaker_settings: Option<FirstSpeakerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_output_medium: Option<OutputMedium>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<CallMedium>,
    #[serde(default)]
    pub recording_enabled: bool,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One stage within a call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStage {
    #[serde(default)]
    pub call_id: String,
    #[serde(default)]
    pub call_stage_id: String,
    #[serde(default)]
    pub created: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inactivity_messages: Vec<TimedMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_exceeded_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_voice: Option<ExternalVoice>,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental_settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<serde_json::Value>,
}

/// An event recorded during a call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEvent {
    #[serde(default)]
    pub call_id: String,
    #[serde(default)]
    pub call_stage_id: String,
    #[serde(default)]
    pub call_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<EventSeverity>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_serializes_camel_case_and_omits_unset() {
        let request = CallRequest::new()
            .system_prompt("You are a helpful assistant.")
            .max_duration(ApiDuration::from_secs(300))
            .medium(CallMedium::server_web_socket(8000, 8000));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemPrompt"], "You are a helpful assistant.");
        assert_eq!(json["maxDuration"], "300s");
        assert!(json.get("voice").is_none());
        assert!(json.get("recordingEnabled").is_none());
        // Query-parameter fields never serialize into the body
        assert!(json.get("priorCallId").is_none());
        assert!(json.get("agentId").is_none());
    }

    #[test]
    fn test_call_response_deserializes() {
        let call: Call = serde_json::from_str(
            r#"{
                "callId": "call-123",
                "joinUrl": "wss://example.com/join/call-123",
                "created": "2023-05-20T12:34:56Z",
                "maxDuration": "3600s",
                "joinTimeout": "300s",
                "initialOutputMedium": "MESSAGE_MEDIUM_VOICE",
                "recordingEnabled": false,
                "errorCount": 0
            }"#,
        )
        .unwrap();
        assert_eq!(call.call_id, "call-123");
        assert_eq!(call.join_url, "wss://example.com/join/call-123");
        assert_eq!(
            call.max_duration.unwrap().as_duration(),
            Duration::from_secs(3600)
        );
        assert_eq!(call.initial_output_medium, Some(OutputMedium::Voice));
    }
}
