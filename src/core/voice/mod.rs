//! Voice-AI service integration.
//!
//! Two halves: a REST client that creates a call and yields a join URL
//! ([`client`]), and the realtime relay that connects to that URL and moves
//! audio and control events ([`relay`]). The remaining modules model the
//! call-creation request surface.

pub mod call;
pub mod client;
pub mod duration;
pub mod events;
pub mod media;
pub mod relay;
pub mod tools;
pub mod voices;

pub use call::{Call, CallEvent, CallRequest, CallStage};
pub use client::{
    DEFAULT_API_BASE_URL, VoiceClient, VoiceClientConfig, VoiceClientError, VoiceClientResult,
};
pub use duration::ApiDuration;
pub use events::{ControlEvent, ErrorEvent, SpeakerRole, StateEvent, TranscriptEvent};
pub use media::{
    CallMedium, EndBehavior, FirstSpeaker, FirstSpeakerSettings, OutputMedium, TimedMessage,
    VadSettings,
};
pub use relay::RelayState;
pub use tools::{SelectedTool, ToolDefinition};
pub use voices::ExternalVoice;
