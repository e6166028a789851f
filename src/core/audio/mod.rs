//! Audio transcoding between the media transport and the voice session.
//!
//! Inbound: RTP payloads (μ-law, A-law or Opus) become little-endian 16-bit
//! PCM for the voice session. Outbound: PCM messages from the voice session
//! become μ-law RTP packets. See [`transcode`] and [`packetizer`].

pub mod g711;
pub mod packetizer;
pub mod transcode;

pub use packetizer::{PCMU_PAYLOAD_TYPE, Packetizer, RtpClock};
pub use transcode::{InboundTranscoder, PayloadDecoder, WaveformCodec};
