//! Inbound transcoding: RTP payloads to linear PCM.
//!
//! Two codec classes exist. Waveform codecs (μ-law, A-law) are stateless and
//! convert sample-by-sample. Compressed codecs (Opus) carry prediction state
//! across packets and need a persistent decoder per stream, resolved once at
//! first use.
//!
//! Output is always little-endian 16-bit PCM at the session sample rate.

use bytes::Bytes;

use super::g711;
use crate::core::error::{BridgeError, BridgeResult};
use crate::core::media::MEDIA_SAMPLE_RATE;

/// Upper bound on decoded samples per compressed frame (120 ms at 48 kHz).
const MAX_OPUS_FRAME_SAMPLES: usize = 5760;

/// Stateless companding codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformCodec {
    /// G.711 μ-law (PCMU)
    MuLaw,
    /// G.711 A-law (PCMA)
    ALaw,
}

impl WaveformCodec {
    fn expand(self, byte: u8) -> i16 {
        match self {
            WaveformCodec::MuLaw => g711::ulaw_to_linear(byte),
            WaveformCodec::ALaw => g711::alaw_to_linear(byte),
        }
    }
}

/// Decoder for one inbound stream.
///
/// Tagged by codec class so every use site matches explicitly instead of
/// re-checking a dynamically-typed handle per packet.
pub enum PayloadDecoder {
    /// Per-sample companding, no persistent state
    Waveform(WaveformCodec),
    /// Persistent decoder carrying prediction state across packets
    Stateful(opus::Decoder),
}

impl PayloadDecoder {
    /// Resolve a decoder for a negotiated codec identifier (MIME type).
    ///
    /// Fails with [`BridgeError::UnsupportedCodec`] for identifiers outside
    /// the negotiated set.
    pub fn for_mime_type(mime_type: &str) -> BridgeResult<Self> {
        match mime_type.to_lowercase().as_str() {
            "audio/pcmu" => Ok(PayloadDecoder::Waveform(WaveformCodec::MuLaw)),
            "audio/pcma" => Ok(PayloadDecoder::Waveform(WaveformCodec::ALaw)),
            "audio/opus" => {
                let decoder = opus::Decoder::new(MEDIA_SAMPLE_RATE, opus::Channels::Mono)?;
                Ok(PayloadDecoder::Stateful(decoder))
            }
            other => Err(BridgeError::UnsupportedCodec(other.to_string())),
        }
    }

    /// Decode one packet payload to little-endian 16-bit PCM.
    pub fn decode(&mut self, payload: &[u8]) -> BridgeResult<Bytes> {
        match self {
            PayloadDecoder::Waveform(codec) => {
                let mut pcm = Vec::with_capacity(payload.len() * 2);
                for &byte in payload {
                    pcm.extend_from_slice(&codec.expand(byte).to_le_bytes());
                }
                Ok(Bytes::from(pcm))
            }
            PayloadDecoder::Stateful(decoder) => {
                let mut samples = vec![0i16; MAX_OPUS_FRAME_SAMPLES];
                let decoded = decoder.decode(payload, &mut samples, false)?;
                let mut pcm = Vec::with_capacity(decoded * 2);
                for sample in &samples[..decoded] {
                    pcm.extend_from_slice(&sample.to_le_bytes());
                }
                Ok(Bytes::from(pcm))
            }
        }
    }
}

/// Transcoder for one inbound media stream.
///
/// The codec identifier comes from track negotiation; the decoder itself is
/// resolved lazily on the first packet so an unsupported identifier drops
/// packets without ending the read loop.
pub struct InboundTranscoder {
    mime_type: String,
    decoder: Option<PayloadDecoder>,
}

impl InboundTranscoder {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            decoder: None,
        }
    }

    /// The negotiated codec identifier this stream carries.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Convert one packet payload to PCM at the session sample rate.
    pub fn transcode(&mut self, payload: &[u8]) -> BridgeResult<Bytes> {
        if self.decoder.is_none() {
            self.decoder = Some(PayloadDecoder::for_mime_type(&self.mime_type)?);
        }
        let decoder = self
            .decoder
            .as_mut()
            .ok_or_else(|| BridgeError::UnsupportedCodec(self.mime_type.clone()))?;
        decoder.decode(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_decode_doubles_length() {
        let mut transcoder = InboundTranscoder::new("audio/PCMU");
        let payload = vec![0xFFu8; 160];
        let pcm = transcoder.transcode(&payload).unwrap();
        assert_eq!(pcm.len(), 320);
        // 0xFF is encoded silence
        assert!(pcm.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_alaw_decode() {
        let mut transcoder = InboundTranscoder::new("audio/PCMA");
        let encoded = g711::linear_to_alaw(1000);
        let pcm = transcoder.transcode(&[encoded]).unwrap();
        let sample = i16::from_le_bytes([pcm[0], pcm[1]]);
        assert!((i32::from(sample) - 1000).abs() <= 100);
    }

    #[test]
    fn test_unsupported_codec_keeps_failing_per_packet() {
        let mut transcoder = InboundTranscoder::new("audio/G722");
        for _ in 0..3 {
            match transcoder.transcode(&[0u8; 10]) {
                Err(BridgeError::UnsupportedCodec(codec)) => assert_eq!(codec, "audio/g722"),
                other => panic!("expected UnsupportedCodec, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_mime_type_case_insensitive() {
        assert!(PayloadDecoder::for_mime_type("audio/PCMU").is_ok());
        assert!(PayloadDecoder::for_mime_type("audio/pcmu").is_ok());
        assert!(PayloadDecoder::for_mime_type("AUDIO/PCMA").is_ok());
    }

    #[test]
    fn test_decoder_resolved_once() {
        let mut transcoder = InboundTranscoder::new("audio/PCMU");
        transcoder.transcode(&[0xFF]).unwrap();
        assert!(transcoder.decoder.is_some());
        transcoder.transcode(&[0xFF]).unwrap();
    }
}
