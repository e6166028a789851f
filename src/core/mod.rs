//! Core bridge pipeline: media negotiation, audio transcoding, session
//! registry and the voice-session relay.

pub mod audio;
pub mod error;
pub mod media;
pub mod observer;
pub mod session;
pub mod voice;

pub use audio::{InboundTranscoder, Packetizer, RtpClock};
pub use error::{BridgeError, BridgeResult};
pub use media::{MEDIA_SAMPLE_RATE, MediaConnection, MediaEvent};
pub use observer::ObserverSlot;
pub use session::{BridgeSession, SessionRegistry, SessionState};
pub use voice::{VoiceClient, VoiceClientConfig};
