//! Error types for the bridge core.
//!
//! Failures here are local by design: a bad packet drops one packet, a dead
//! transport ends one read loop. Nothing in the core escalates to a global
//! abort; overall recovery means negotiating an entirely new session.

use thiserror::Error;

/// Errors that can occur inside the audio-relay pipeline.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Offer/answer exchange with the media engine failed.
    /// Fatal to the negotiation attempt; surfaced to the signaling caller.
    #[error("negotiation failed: {0}")]
    Negotiation(String),

    /// Packet carried a codec identifier outside the negotiated set.
    /// Drops one packet; the read loop continues.
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Decoding a payload failed (e.g. a corrupt compressed frame).
    /// Drops one packet; the read loop continues.
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// Reading from a transport failed. Terminal for the affected loop only.
    #[error("transport read failed: {0}")]
    TransportRead(String),

    /// Inbound text frame was not a usable control message.
    /// Dropped and logged, non-fatal.
    #[error("malformed control message: {0}")]
    MalformedControlMessage(String),

    /// A best-effort write failed. Logged, never retried.
    #[error("send failed: {0}")]
    SendFailure(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

impl From<opus::Error> for BridgeError {
    fn from(err: opus::Error) -> Self {
        BridgeError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::UnsupportedCodec("audio/G722".to_string());
        assert!(err.to_string().contains("unsupported codec"));

        let err = BridgeError::MalformedControlMessage("missing type".to_string());
        assert!(err.to_string().contains("malformed control message"));
    }
}
