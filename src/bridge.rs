//! Negotiation-to-session wiring.
//!
//! Consumes the media event stream of one negotiated connection: a connected
//! transport creates and registers a bridge session and dials the voice
//! service; remote tracks get a decode loop; a terminal transport state
//! tears the session down. The media side and the voice side unwind
//! independently — neither teardown waits on the other.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use webrtc::track::track_remote::TrackRemote;

use crate::core::media::{MEDIA_SAMPLE_RATE, MediaConnection, MediaEvent};
use crate::core::session::{BridgeSession, SessionRegistry, SessionState};
use crate::core::voice::media::{CallMedium, EndBehavior, FirstSpeakerSettings, TimedMessage};
use crate::core::voice::{ApiDuration, CallRequest, VadSettings, relay};
use crate::core::error::BridgeError;
use crate::core::InboundTranscoder;
use crate::state::AppState;

/// Drive one media connection's event stream to completion.
pub fn drive_media_events(
    state: Arc<AppState>,
    media: MediaConnection,
    mut events: mpsc::Receiver<MediaEvent>,
) {
    tokio::spawn(async move {
        let mut session_id = None;
        while let Some(event) = events.recv().await {
            match event {
                MediaEvent::Connected => {
                    let session = Arc::new(BridgeSession::new(media.outbound_track()));
                    session_id = Some(session.id());
                    state.registry.set_active(Arc::clone(&session));
                    tracing::info!(
                        session_id = %session.id(),
                        "media transport connected, starting voice session"
                    );
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        start_voice_session(state, session).await;
                    });
                }
                MediaEvent::Track(track) => {
                    let registry = state.registry.clone();
                    tokio::spawn(async move {
                        run_inbound_loop(track, registry).await;
                    });
                }
                MediaEvent::Closed => {
                    if let Some(id) = session_id.take()
                        && let Some(session) = state.registry.take_if(id)
                    {
                        session.cancellation().cancel();
                        session.set_state(SessionState::Closed);
                        tracing::info!(session_id = %id, "media transport closed, session torn down");
                    }
                    media.close().await;
                    break;
                }
            }
        }
    });
}

/// Create the voice call and relay it until either side ends.
async fn start_voice_session(state: Arc<AppState>, session: Arc<BridgeSession>) {
    let request = build_call_request(&state);
    let call = match state.voice.create_call(&request).await {
        Ok(call) => call,
        Err(e) => {
            tracing::error!(session_id = %session.id(), "failed to create voice call: {e}");
            session.set_state(SessionState::Closed);
            return;
        }
    };

    tracing::info!(
        call_id = %call.call_id,
        max_duration = ?call.max_duration,
        join_timeout = ?call.join_timeout,
        "voice call created"
    );

    relay::run(&call.join_url, session, state.observer.clone()).await;
}

/// Build the call-creation request from server configuration.
fn build_call_request(state: &AppState) -> CallRequest {
    let voice = &state.config.voice;

    let mut vad = VadSettings::conversational();
    vad.turn_endpoint_delay = Some(ApiDuration::from_millis(400));

    let mut request = CallRequest::new()
        .system_prompt(voice.system_prompt.clone())
        .max_duration(ApiDuration::from_secs(voice.max_call_duration_secs))
        .vad_settings(vad)
        .inactivity_messages(vec![
            TimedMessage::new(
                Duration::from_secs(5),
                "Are you still there? I'm here to help if you need anything.",
                EndBehavior::Unspecified,
            ),
            TimedMessage::new(
                Duration::from_secs(15),
                "I'll wait a bit longer in case you want to continue our conversation.",
                EndBehavior::Unspecified,
            ),
            TimedMessage::new(
                Duration::from_secs(20),
                "Since I haven't heard from you, I'll be ending our call now. \
                 Feel free to call back anytime if you need assistance!",
                EndBehavior::HangUpSoft,
            ),
        ])
        .recording_enabled(voice.recording_enabled)
        .medium(CallMedium::server_web_socket(
            MEDIA_SAMPLE_RATE,
            MEDIA_SAMPLE_RATE,
        ));

    if let Some(model) = &voice.model {
        request = request.model(model.clone());
    }
    if let Some(name) = &voice.voice {
        request = request.voice(name.clone());
    }
    if let Some(greeting) = &voice.greeting {
        request = request.first_speaker_settings(FirstSpeakerSettings::agent_first(
            false,
            greeting.clone(),
            "",
            Duration::ZERO,
        ));
    }
    if let Some(agent_id) = &voice.agent_id {
        request = request.agent(agent_id.clone());
    }
    request
}

/// Decode one remote track and forward PCM to whatever session is active.
///
/// Per-packet failures drop that packet and keep reading; a read error ends
/// only this loop. If no session is active the decoded buffer is silently
/// dropped — no queuing, no retry.
async fn run_inbound_loop(track: Arc<TrackRemote>, registry: SessionRegistry) {
    let mime_type = track.codec().capability.mime_type;
    if let Some(session) = registry.active() {
        session.set_inbound_codec(&mime_type);
    }
    let mut transcoder = InboundTranscoder::new(&mime_type);

    loop {
        match track.read_rtp().await {
            Ok((packet, _)) => match transcoder.transcode(&packet.payload) {
                Ok(pcm) => {
                    if let Some(session) = registry.active() {
                        session.send_pcm(pcm);
                    }
                }
                Err(e) => {
                    tracing::warn!("dropping inbound packet: {e}");
                }
            },
            Err(e) => {
                let err = BridgeError::TransportRead(e.to_string());
                tracing::info!("inbound track ended: {err}");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn state_with(voice_overrides: impl FnOnce(&mut crate::config::VoiceSettings)) -> Arc<AppState> {
        let mut config = ServerConfig::default();
        config.voice.api_key = "test-key".to_string();
        voice_overrides(&mut config.voice);
        AppState::new(config).unwrap()
    }

    #[test]
    fn test_call_request_carries_websocket_medium() {
        let state = state_with(|_| {});
        let request = build_call_request(&state);
        let medium = request.medium.unwrap().server_web_socket.unwrap();
        assert_eq!(medium.input_sample_rate, MEDIA_SAMPLE_RATE);
        assert_eq!(medium.output_sample_rate, Some(MEDIA_SAMPLE_RATE));
    }

    #[test]
    fn test_greeting_becomes_agent_first_speaker() {
        let state = state_with(|voice| {
            voice.greeting = Some("Hello! How can I assist you today?".to_string());
        });
        let request = build_call_request(&state);
        let agent = request.first_speaker_settings.unwrap().agent.unwrap();
        assert_eq!(
            agent.text.as_deref(),
            Some("Hello! How can I assist you today?")
        );
        assert!(!agent.uninterruptible);
    }

    #[test]
    fn test_agent_id_routes_to_agent_endpoint() {
        let state = state_with(|voice| {
            voice.agent_id = Some("agent-42".to_string());
        });
        let request = build_call_request(&state);
        assert_eq!(request.agent_id.as_deref(), Some("agent-42"));
    }
}
