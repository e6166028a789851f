//! Bridge sessions and the single-slot session registry.
//!
//! A session is one active pairing of a media connection and a voice-session
//! connection. The registry holds at most one; a newly created session
//! unconditionally replaces the previous reference. There is no table of
//! sessions and no queue of pending ones.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use webrtc::track::track_local::TrackLocalWriter;
use webrtc::track::track_local::track_local_static_rtp::TrackLocalStaticRTP;

use crate::core::audio::Packetizer;
use crate::core::error::{BridgeError, BridgeResult};

/// Fixed synchronization-source identifier for the outbound stream.
pub const OUTBOUND_SSRC: u32 = 12_345;

/// Lifecycle of a bridge session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created; the voice session is not yet dialed.
    Negotiating,
    /// The voice-session connection is open and relaying.
    Connected,
    /// Terminal. Recovery requires a fresh negotiation-and-session cycle.
    Closed,
}

/// One active pairing of a media connection and a voice-session connection.
///
/// Owns the outbound RTP counters exclusively; they start at zero and are
/// never inherited across sessions. The session holds transport handles but
/// releases none of them itself.
pub struct BridgeSession {
    id: Uuid,
    outbound_track: Arc<TrackLocalStaticRTP>,
    packetizer: Mutex<Packetizer>,
    state: Mutex<SessionState>,
    inbound_codec: Mutex<Option<String>>,
    voice_tx: Mutex<Option<mpsc::Sender<Message>>>,
    cancel: CancellationToken,
}

impl BridgeSession {
    /// Create a session around a media connection's outbound track.
    pub fn new(outbound_track: Arc<TrackLocalStaticRTP>) -> Self {
        Self {
            id: Uuid::new_v4(),
            outbound_track,
            packetizer: Mutex::new(Packetizer::new(OUTBOUND_SSRC)),
            state: Mutex::new(SessionState::Negotiating),
            inbound_codec: Mutex::new(None),
            voice_tx: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn set_state(&self, state: SessionState) {
        *self.state.lock() = state;
    }

    /// Token bound to the voice-session connection's lifetime. Cancelling it
    /// ends the relay read loop.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Record which codec the remote negotiated for the inbound direction.
    pub fn set_inbound_codec(&self, mime_type: impl Into<String>) {
        *self.inbound_codec.lock() = Some(mime_type.into());
    }

    pub fn inbound_codec(&self) -> Option<String> {
        self.inbound_codec.lock().clone()
    }

    /// Attach the serialized write handle for the voice-session connection.
    pub fn attach_voice_sender(&self, sender: mpsc::Sender<Message>) {
        *self.voice_tx.lock() = Some(sender);
    }

    /// Forward one PCM buffer to the voice session, best-effort.
    ///
    /// Returns false when no connection is attached or its write queue is
    /// unavailable; the buffer is dropped either way. No queuing, no retry.
    pub fn send_pcm(&self, pcm: Bytes) -> bool {
        let guard = self.voice_tx.lock();
        match guard.as_ref() {
            Some(sender) => match sender.try_send(Message::Binary(pcm)) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("dropping PCM for voice session: {e}");
                    false
                }
            },
            None => false,
        }
    }

    /// Packetize one PCM message from the voice session and write it to the
    /// outbound track.
    pub async fn write_outbound(&self, pcm: &[u8]) -> BridgeResult<()> {
        let packet = self.packetizer.lock().packetize(pcm);
        self.outbound_track
            .write_rtp(&packet)
            .await
            .map_err(|e| BridgeError::SendFailure(format!("outbound track write: {e}")))?;
        Ok(())
    }

    /// Snapshot of the outbound counters, for diagnostics and tests.
    pub fn rtp_clock(&self) -> crate::core::audio::RtpClock {
        self.packetizer.lock().clock()
    }
}

/// Single mutable slot holding at most one active [`BridgeSession`].
///
/// Every access goes through one exclusive lock so no reader observes a
/// partially-constructed session.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Option<Arc<BridgeSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally replace the active session.
    ///
    /// The superseded session's cancellation token is triggered so its relay
    /// loop stops writing to a stale transport reference. The registry does
    /// not release transport resources itself.
    pub fn set_active(&self, session: Arc<BridgeSession>) {
        let previous = self.inner.lock().replace(session);
        if let Some(previous) = previous {
            previous.cancel.cancel();
            tracing::debug!(session_id = %previous.id(), "replaced active session");
        }
    }

    /// The active session, or none.
    pub fn active(&self) -> Option<Arc<BridgeSession>> {
        self.inner.lock().clone()
    }

    /// Remove the active session only if it is still the one with `id`.
    ///
    /// Keeps a teardown for an already-replaced session from evicting its
    /// successor.
    pub fn take_if(&self, id: Uuid) -> Option<Arc<BridgeSession>> {
        let mut guard = self.inner.lock();
        if guard.as_ref().is_some_and(|s| s.id() == id) {
            guard.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrtc::api::media_engine::MIME_TYPE_PCMU;
    use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;

    fn track() -> Arc<TrackLocalStaticRTP> {
        Arc::new(TrackLocalStaticRTP::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_PCMU.to_owned(),
                clock_rate: 8000,
                channels: 1,
                ..Default::default()
            },
            "audio".to_owned(),
            "test".to_owned(),
        ))
    }

    #[test]
    fn test_fresh_session_counters_start_at_zero() {
        let session = BridgeSession::new(track());
        let clock = session.rtp_clock();
        assert_eq!(clock.sequence, 0);
        assert_eq!(clock.timestamp, 0);

        // A replacement session starts from zero regardless of prior values
        let registry = SessionRegistry::new();
        registry.set_active(Arc::new(session));
        let replacement = Arc::new(BridgeSession::new(track()));
        registry.set_active(Arc::clone(&replacement));
        let clock = registry.active().unwrap().rtp_clock();
        assert_eq!(clock.sequence, 0);
        assert_eq!(clock.timestamp, 0);
    }

    #[test]
    fn test_registry_replacement_is_whole() {
        let registry = SessionRegistry::new();
        let a = Arc::new(BridgeSession::new(track()));
        let b = Arc::new(BridgeSession::new(track()));
        b.set_inbound_codec("audio/PCMA");
        b.set_state(SessionState::Connected);

        registry.set_active(Arc::clone(&a));
        registry.set_active(Arc::clone(&b));

        let active = registry.active().unwrap();
        assert_eq!(active.id(), b.id());
        assert_eq!(active.inbound_codec().as_deref(), Some("audio/PCMA"));
        assert_eq!(active.state(), SessionState::Connected);
    }

    #[test]
    fn test_replacement_cancels_previous_session() {
        let registry = SessionRegistry::new();
        let a = Arc::new(BridgeSession::new(track()));
        let token = a.cancellation();
        registry.set_active(a);
        assert!(!token.is_cancelled());

        registry.set_active(Arc::new(BridgeSession::new(track())));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_take_if_only_matches_same_session() {
        let registry = SessionRegistry::new();
        let a = Arc::new(BridgeSession::new(track()));
        let b = Arc::new(BridgeSession::new(track()));
        registry.set_active(Arc::clone(&a));
        registry.set_active(Arc::clone(&b));

        assert!(registry.take_if(a.id()).is_none());
        assert!(registry.active().is_some());
        assert!(registry.take_if(b.id()).is_some());
        assert!(registry.active().is_none());
    }

    #[test]
    fn test_send_pcm_without_connection_drops() {
        let session = BridgeSession::new(track());
        assert!(!session.send_pcm(Bytes::from_static(&[0, 0])));

        let (tx, mut rx) = mpsc::channel(4);
        session.attach_voice_sender(tx);
        assert!(session.send_pcm(Bytes::from_static(&[1, 2])));
        match rx.try_recv().unwrap() {
            Message::Binary(data) => assert_eq!(data.as_ref(), &[1, 2]),
            other => panic!("expected binary message, got {other:?}"),
        }
    }
}
