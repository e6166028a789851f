//! Outbound packetization: PCM frames to RTP packets.
//!
//! Every PCM message from the voice session becomes exactly one packet; no
//! batching or fragmentation across messages. Each 16-bit sample compands to
//! one μ-law byte, so the payload sample count equals its byte length and
//! the timestamp advance equals the payload size (clock rate == sample rate).

use bytes::Bytes;
use webrtc::rtp::header::Header;
use webrtc::rtp::packet::Packet;

use super::g711;

/// RTP payload type for G.711 μ-law.
pub const PCMU_PAYLOAD_TYPE: u8 = 0;

/// Sequence and timestamp counters for one outbound stream.
///
/// Both wrap at their bit width. Owned exclusively by the session and reset
/// to zero at session creation; never shared or inherited across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RtpClock {
    pub sequence: u16,
    pub timestamp: u32,
}

impl RtpClock {
    /// Advance the clock for one packet of `samples` encoded samples.
    ///
    /// The timestamp advances before assignment; the sequence number is
    /// assigned then incremented.
    fn advance(&mut self, samples: u32) -> (u16, u32) {
        self.timestamp = self.timestamp.wrapping_add(samples);
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        (sequence, self.timestamp)
    }
}

/// Converts PCM messages from the voice session into framed RTP packets.
#[derive(Debug)]
pub struct Packetizer {
    ssrc: u32,
    clock: RtpClock,
}

impl Packetizer {
    /// Create a packetizer with zeroed counters and a fixed stream id.
    pub fn new(ssrc: u32) -> Self {
        Self {
            ssrc,
            clock: RtpClock::default(),
        }
    }

    /// Current counter values.
    pub fn clock(&self) -> RtpClock {
        self.clock
    }

    /// Build one RTP packet from one little-endian 16-bit PCM message.
    ///
    /// A trailing odd byte is ignored, matching the sample-pair framing of
    /// the wire format.
    pub fn packetize(&mut self, pcm: &[u8]) -> Packet {
        let payload: Vec<u8> = pcm
            .chunks_exact(2)
            .map(|pair| g711::linear_to_ulaw(i16::from_le_bytes([pair[0], pair[1]])))
            .collect();
        let samples = payload.len() as u32;
        let (sequence_number, timestamp) = self.clock.advance(samples);

        Packet {
            header: Header {
                version: 2,
                payload_type: PCMU_PAYLOAD_TYPE,
                sequence_number,
                timestamp,
                ssrc: self.ssrc,
                ..Default::default()
            },
            payload: Bytes::from(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::transcode::InboundTranscoder;

    fn pcm_message(samples: usize) -> Vec<u8> {
        let mut pcm = Vec::with_capacity(samples * 2);
        for i in 0..samples {
            pcm.extend_from_slice(&((i as i16) * 7).to_le_bytes());
        }
        pcm
    }

    #[test]
    fn test_header_fields() {
        let mut packetizer = Packetizer::new(12_345);
        let packet = packetizer.packetize(&pcm_message(160));
        assert_eq!(packet.header.version, 2);
        assert_eq!(packet.header.payload_type, PCMU_PAYLOAD_TYPE);
        assert_eq!(packet.header.ssrc, 12_345);
        assert_eq!(packet.payload.len(), 160);
    }

    #[test]
    fn test_counters_accumulate_over_n_packets() {
        let mut packetizer = Packetizer::new(1);
        let message = pcm_message(160);
        let n = 1000u32;
        for _ in 0..n {
            packetizer.packetize(&message);
        }
        let clock = packetizer.clock();
        assert_eq!(u32::from(clock.sequence), n % 65_536);
        assert_eq!(clock.timestamp, n * 160);
    }

    #[test]
    fn test_sequence_wraps_at_16_bits() {
        let mut clock = RtpClock {
            sequence: 65_534,
            timestamp: 0,
        };
        let (first, _) = clock.advance(160);
        let (second, _) = clock.advance(160);
        let (third, _) = clock.advance(160);
        assert_eq!(first, 65_534);
        assert_eq!(second, 65_535);
        assert_eq!(third, 0);
    }

    #[test]
    fn test_timestamp_wraps_at_32_bits() {
        let mut clock = RtpClock {
            sequence: 0,
            timestamp: u32::MAX - 100,
        };
        let (_, timestamp) = clock.advance(160);
        assert_eq!(timestamp, 59);
    }

    #[test]
    fn test_sequence_counter_matches_modular_sum() {
        let mut clock = RtpClock::default();
        for _ in 0..70_000u32 {
            clock.advance(160);
        }
        assert_eq!(u32::from(clock.sequence), 70_000 % 65_536);
        assert_eq!(clock.timestamp, 70_000u32.wrapping_mul(160));
    }

    #[test]
    fn test_odd_trailing_byte_ignored() {
        let mut packetizer = Packetizer::new(1);
        let packet = packetizer.packetize(&[0, 0, 0]);
        assert_eq!(packet.payload.len(), 1);
        assert_eq!(packetizer.clock().timestamp, 1);
    }

    /// 20 ms of 8 kHz μ-law in, decoded and re-encoded, is 20 ms out and
    /// advances the outbound timestamp by exactly the sample count.
    #[test]
    fn test_end_to_end_20ms_frame() {
        let inbound: Vec<u8> = (0..160u32).map(|i| (i % 256) as u8).collect();

        let mut transcoder = InboundTranscoder::new("audio/PCMU");
        let pcm = transcoder.transcode(&inbound).unwrap();
        assert_eq!(pcm.len(), 320);

        let mut packetizer = Packetizer::new(12_345);
        let packet = packetizer.packetize(&pcm);
        assert_eq!(packet.payload.len(), 160);
        assert_eq!(packetizer.clock().timestamp, 160);
    }
}
