//! Media negotiation with the WebRTC engine.
//!
//! One fixed low-bandwidth codec (G.711 μ-law) is offered outbound to keep
//! the packetizer simple; inbound, any codec from the negotiated set
//! {PCMU, PCMA, Opus} is accepted and identified per stream. ICE, encryption
//! and congestion handling stay inside the engine.
//!
//! Connection-state and track callbacks are translated onto an explicit
//! [`MediaEvent`] channel so session wiring is testable without a live
//! transport engine.

use std::sync::Arc;

use tokio::sync::mpsc;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_PCMA, MIME_TYPE_PCMU, MediaEngine};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::{
    RTCRtpCodecCapability, RTCRtpCodecParameters, RTPCodecType,
};
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_rtp::TrackLocalStaticRTP;
use webrtc::track::track_remote::TrackRemote;

use crate::core::error::{BridgeError, BridgeResult};

/// Session sample rate in Hz. The RTP clock rate for G.711 equals it.
pub const MEDIA_SAMPLE_RATE: u32 = 8000;

/// Capacity of the media event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Transitions surfaced by the media transport.
#[derive(Debug)]
pub enum MediaEvent {
    /// The transport reached a connected state; a bridge session can start.
    Connected,
    /// The transport failed, disconnected or closed; tear the session down.
    Closed,
    /// A remote audio track started.
    Track(Arc<TrackRemote>),
}

/// One negotiated media connection with a browser peer.
pub struct MediaConnection {
    peer: Arc<RTCPeerConnection>,
    outbound_track: Arc<TrackLocalStaticRTP>,
}

impl MediaConnection {
    /// Create a peer connection with the fixed outbound μ-law track and the
    /// inbound codec set registered. Returns the connection plus the event
    /// stream its callbacks feed.
    pub async fn new(
        stun_servers: &[String],
    ) -> BridgeResult<(Self, mpsc::Receiver<MediaEvent>)> {
        let mut media_engine = MediaEngine::default();
        register_inbound_codecs(&mut media_engine)?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(|e| BridgeError::Negotiation(format!("interceptor registry: {e}")))?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: stun_servers.to_vec(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let peer = Arc::new(
            api.new_peer_connection(config)
                .await
                .map_err(|e| BridgeError::Negotiation(format!("peer connection: {e}")))?,
        );

        let outbound_track = Arc::new(TrackLocalStaticRTP::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_PCMU.to_owned(),
                clock_rate: MEDIA_SAMPLE_RATE,
                channels: 1,
                ..Default::default()
            },
            "audio".to_owned(),
            "voicebridge".to_owned(),
        ));

        peer.add_track(Arc::clone(&outbound_track) as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .map_err(|e| BridgeError::Negotiation(format!("add track: {e}")))?;

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let tx = event_tx.clone();
        peer.on_ice_connection_state_change(Box::new(move |state: RTCIceConnectionState| {
            tracing::info!(%state, "media connection state changed");
            let tx = tx.clone();
            Box::pin(async move {
                match state {
                    RTCIceConnectionState::Connected => {
                        let _ = tx.send(MediaEvent::Connected).await;
                    }
                    RTCIceConnectionState::Disconnected
                    | RTCIceConnectionState::Failed
                    | RTCIceConnectionState::Closed => {
                        let _ = tx.send(MediaEvent::Closed).await;
                    }
                    _ => {}
                }
            })
        }));

        let tx = event_tx;
        peer.on_track(Box::new(move |track, _receiver, _transceiver| {
            let mime_type = track.codec().capability.mime_type;
            tracing::info!(
                payload_type = track.payload_type(),
                %mime_type,
                "remote track started"
            );
            let tx = tx.clone();
            Box::pin(async move {
                if mime_type.to_lowercase().starts_with("audio/") {
                    let _ = tx.send(MediaEvent::Track(track)).await;
                }
            })
        }));

        Ok((
            Self {
                peer,
                outbound_track,
            },
            event_rx,
        ))
    }

    /// Apply a remote offer and produce the local answer.
    ///
    /// Waits for ICE candidate gathering to complete so the answer carries
    /// every candidate in one shot.
    pub async fn accept(
        &self,
        offer: RTCSessionDescription,
    ) -> BridgeResult<RTCSessionDescription> {
        self.peer
            .set_remote_description(offer)
            .await
            .map_err(|e| BridgeError::Negotiation(format!("set remote description: {e}")))?;

        let answer = self
            .peer
            .create_answer(None)
            .await
            .map_err(|e| BridgeError::Negotiation(format!("create answer: {e}")))?;

        let mut gather_complete = self.peer.gathering_complete_promise().await;
        self.peer
            .set_local_description(answer)
            .await
            .map_err(|e| BridgeError::Negotiation(format!("set local description: {e}")))?;
        let _ = gather_complete.recv().await;

        self.peer
            .local_description()
            .await
            .ok_or_else(|| BridgeError::Negotiation("missing local description".to_string()))
    }

    /// The fixed outbound μ-law track.
    pub fn outbound_track(&self) -> Arc<TrackLocalStaticRTP> {
        Arc::clone(&self.outbound_track)
    }

    /// Close the peer connection.
    pub async fn close(&self) {
        if let Err(e) = self.peer.close().await {
            tracing::warn!("failed to close peer connection: {e}");
        }
    }
}

/// Register the inbound codec set: PCMU (0), PCMA (8) and Opus (111).
fn register_inbound_codecs(media_engine: &mut MediaEngine) -> BridgeResult<()> {
    let codecs = [
        RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: MIME_TYPE_PCMU.to_owned(),
                clock_rate: MEDIA_SAMPLE_RATE,
                channels: 1,
                ..Default::default()
            },
            payload_type: 0,
            ..Default::default()
        },
        RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: MIME_TYPE_PCMA.to_owned(),
                clock_rate: MEDIA_SAMPLE_RATE,
                channels: 1,
                ..Default::default()
            },
            payload_type: 8,
            ..Default::default()
        },
        RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48_000,
                channels: 2,
                sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                ..Default::default()
            },
            payload_type: 111,
            ..Default::default()
        },
    ];

    for codec in codecs {
        media_engine
            .register_codec(codec, RTPCodecType::Audio)
            .map_err(|e| BridgeError::Negotiation(format!("register codec: {e}")))?;
    }
    Ok(())
}
