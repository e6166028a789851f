//! HTTP signaling endpoint for SDP offer/answer exchange.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::bridge;
use crate::core::media::MediaConnection;
use crate::errors::AppResult;
use crate::state::AppState;

/// SDP message exchanged with the browser.
#[derive(Debug, Serialize, Deserialize)]
pub struct SdpMessage {
    #[serde(rename = "type")]
    pub kind: RTCSdpType,
    pub sdp: RTCSessionDescription,
}

/// `POST /api/sdp/offer`
///
/// Accepts a remote offer, negotiates a media connection and returns the
/// answer once ICE gathering completes. The connection's event stream is
/// handed to the bridge, which creates a session when the transport
/// connects. Negotiation failures surface as an HTTP error to the caller.
pub async fn sdp_offer(
    State(state): State<Arc<AppState>>,
    Json(offer): Json<SdpMessage>,
) -> AppResult<Json<SdpMessage>> {
    let (media, events) = MediaConnection::new(&state.config.stun_servers).await?;
    let answer = media.accept(offer.sdp).await?;

    bridge::drive_media_events(Arc::clone(&state), media, events);

    Ok(Json(SdpMessage {
        kind: RTCSdpType::Answer,
        sdp: answer,
    }))
}
