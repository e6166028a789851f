//! Event relay for the voice-session connection.
//!
//! Owns the duplex WebSocket to the voice service and the control-channel
//! state machine: Dialing → Connected → Closed. Closed is terminal — there
//! is no automatic reconnection; recovery means a fresh
//! negotiation-and-session cycle.
//!
//! Binary frames are PCM messages for the outbound packetizer. Text frames
//! are JSON control events, mirrored to the observer and handled locally.
//! All writes to the connection go through one writer task so concurrent
//! producers never interleave partial writes.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::events::ControlEvent;
use crate::core::error::BridgeError;
use crate::core::observer::ObserverSlot;
use crate::core::session::{BridgeSession, SessionState};

/// Capacity of the serialized write queue to the voice connection.
const WS_CHANNEL_CAPACITY: usize = 256;

/// Control-channel connection states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Call requested, connection not yet established.
    Dialing,
    /// Duplex connection open, read loop active.
    Connected,
    /// Any read error, including orderly shutdown. Terminal.
    Closed,
}

/// Dial the voice session and relay frames until the connection ends or the
/// session's cancellation token fires.
pub async fn run(join_url: &str, session: Arc<BridgeSession>, observer: ObserverSlot) {
    let session_id = session.id();
    let cancel = session.cancellation();
    let mut state = RelayState::Dialing;
    tracing::info!(%session_id, "dialing voice session");

    let (ws, _response) = match connect_async(join_url).await {
        Ok(connected) => connected,
        Err(e) => {
            tracing::error!(%session_id, "voice session dial failed: {e}");
            transition(session_id, &mut state, RelayState::Closed);
            session.set_state(SessionState::Closed);
            return;
        }
    };
    transition(session_id, &mut state, RelayState::Connected);
    session.set_state(SessionState::Connected);

    let (mut ws_sink, mut ws_stream) = ws.split();
    let (write_tx, mut write_rx) = mpsc::channel::<Message>(WS_CHANNEL_CAPACITY);
    session.attach_voice_sender(write_tx.clone());

    // Single writer serializes every outgoing frame
    let writer = tokio::spawn(async move {
        while let Some(message) = write_rx.recv().await {
            if let Err(e) = ws_sink.send(message).await {
                tracing::error!("failed to send to voice session: {e}");
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(%session_id, "voice session cancelled");
                break;
            }
            next = ws_stream.next() => {
                match next {
                    Some(Ok(Message::Binary(pcm))) => {
                        if let Err(e) = session.write_outbound(&pcm).await {
                            tracing::warn!(%session_id, "dropping outbound packet: {e}");
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        dispatch_control(text.as_str(), &observer);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write_tx.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!(%session_id, "voice session closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let err = BridgeError::TransportRead(e.to_string());
                        tracing::error!(%session_id, "voice session ended: {err}");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    transition(session_id, &mut state, RelayState::Closed);
    session.set_state(SessionState::Closed);
    writer.abort();
}

fn transition(session_id: uuid::Uuid, state: &mut RelayState, to: RelayState) {
    tracing::debug!(%session_id, from = ?state, to = ?to, "relay state change");
    *state = to;
}

/// Dispatch one text frame from the control channel.
///
/// Malformed frames (not JSON, or no usable message kind) are logged and
/// dropped without ending the loop. Every recognizable frame mirrors
/// verbatim to the observer; locally, only finalized transcripts are logged
/// while partial deltas stay silent.
pub(crate) fn dispatch_control(raw: &str, observer: &ObserverSlot) {
    let event = match ControlEvent::parse(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("dropping control frame: {e}");
            return;
        }
    };

    observer.mirror(raw);

    match event {
        ControlEvent::Transcript(t) if t.is_final => {
            tracing::info!(role = %t.role, "transcript: {}", t.text);
        }
        ControlEvent::Transcript(_) => {}
        ControlEvent::Error(e) => {
            tracing::error!("voice session error: {}", e.error);
        }
        ControlEvent::State(s) => {
            tracing::info!("voice session state: {}", s.state);
        }
        ControlEvent::Unknown { kind } => {
            tracing::debug!(%kind, "unhandled control event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn attached_observer() -> (ObserverSlot, mpsc::Receiver<String>) {
        let slot = ObserverSlot::new();
        let (tx, rx) = mpsc::channel(16);
        slot.attach(tx);
        (slot, rx)
    }

    #[test]
    fn test_malformed_frame_is_dropped_not_mirrored() {
        let (observer, mut rx) = attached_observer();
        dispatch_control("{not valid json", &observer);
        dispatch_control(r#"{"state":"no kind field"}"#, &observer);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_recognized_frames_mirror_verbatim() {
        let (observer, mut rx) = attached_observer();
        let raw = r#"{"type":"transcript","role":"agent","final":true,"text":"Hi"}"#;
        dispatch_control(raw, &observer);
        assert_eq!(rx.try_recv().unwrap(), raw);
    }

    #[test]
    fn test_partial_transcripts_still_mirror() {
        let (observer, mut rx) = attached_observer();
        let raw = r#"{"type":"transcript","role":"agent","final":false,"delta":"H"}"#;
        dispatch_control(raw, &observer);
        assert_eq!(rx.try_recv().unwrap(), raw);
    }

    #[test]
    fn test_unknown_kind_mirrors() {
        let (observer, mut rx) = attached_observer();
        let raw = r#"{"type":"pong"}"#;
        dispatch_control(raw, &observer);
        assert_eq!(rx.try_recv().unwrap(), raw);
    }

    #[test]
    fn test_dispatch_without_observer_does_not_panic() {
        let observer = ObserverSlot::new();
        dispatch_control(r#"{"type":"state","state":"idle"}"#, &observer);
        dispatch_control("{not valid json", &observer);
    }
}
