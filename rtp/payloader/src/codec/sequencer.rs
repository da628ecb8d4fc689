//! RTP session framing for payloader output
//!
//! [`RtpSequencer`] sits between an [`AudioPayloader`] and the network. It
//! owns the per-session values the payloader leaves out (SSRC, sequence
//! number and timestamp base) and turns each [`AudioPacket`] into an
//! [`RtpPacket`].
//!
//! [`AudioPayloader`]: crate::codec::audio::AudioPayloader

use crate::codec::audio::AudioPacket;
use crate::codec::rtp::{RtpHeader, RtpPacket};
use crate::error::Result;
use crate::traits::PacketSink;
use rand::Rng;

/// Assigns SSRC, sequence numbers and RTP timestamps, then forwards the
/// finished packet to `inner`.
pub struct RtpSequencer<F>
where
    F: FnMut(RtpPacket) -> Result<()>,
{
    ssrc: u32,
    sequence_number: u16,
    timestamp_base: u32,
    inner: F,
}

impl<F> RtpSequencer<F>
where
    F: FnMut(RtpPacket) -> Result<()>,
{
    /// Create a sequencer with random SSRC, initial sequence number and
    /// timestamp base (RFC 3550 Section 5.1).
    ///
    /// # Arguments
    /// * `inner` - Receives every framed packet
    pub fn new(inner: F) -> Self {
        let mut rng = rand::thread_rng();

        RtpSequencer {
            ssrc: rng.gen_range(0..=u32::MAX),
            sequence_number: rng.gen_range(0..=u16::MAX),
            timestamp_base: rng.gen_range(0..=u32::MAX),
            inner,
        }
    }

    /// Create a sequencer with fixed session values.
    pub fn with_params(ssrc: u32, sequence_number: u16, timestamp_base: u32, inner: F) -> Self {
        RtpSequencer {
            ssrc,
            sequence_number,
            timestamp_base,
            inner,
        }
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// Sequence number the next packet will carry.
    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    pub fn timestamp_base(&self) -> u32 {
        self.timestamp_base
    }

    /// Frames one payloader packet.
    fn frame(&mut self, packet: AudioPacket) -> RtpPacket {
        let mut header = RtpHeader::new(packet.payload_type, self.ssrc);
        header.marker = packet.marker;
        header.sequence_number = self.sequence_number;
        header.timestamp = self.timestamp_base.wrapping_add(packet.rtp_offset);

        self.sequence_number = self.sequence_number.wrapping_add(1);

        RtpPacket::new(header, packet.payload)
    }
}

impl<F> PacketSink for RtpSequencer<F>
where
    F: FnMut(RtpPacket) -> Result<()>,
{
    fn emit(&mut self, packet: AudioPacket) -> Result<()> {
        let rtp = self.frame(packet);
        (self.inner)(rtp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn audio_packet(rtp_offset: u32, marker: bool) -> AudioPacket {
        AudioPacket {
            payload_type: 8,
            marker,
            discont: marker,
            timestamp: None,
            rtp_offset,
            payload: Bytes::from_static(&[0xD5; 160]),
        }
    }

    #[test]
    fn test_sequencer_frames_packets() {
        let mut out = Vec::new();
        let mut sequencer = RtpSequencer::with_params(0xCAFE, 10, 1000, |packet| {
            out.push(packet);
            Ok(())
        });

        sequencer.emit(audio_packet(0, true)).unwrap();
        sequencer.emit(audio_packet(160, false)).unwrap();
        drop(sequencer);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].header.ssrc, 0xCAFE);
        assert_eq!(out[0].header.payload_type, 8);
        assert_eq!(out[0].header.sequence_number, 10);
        assert_eq!(out[0].header.timestamp, 1000);
        assert!(out[0].header.marker);
        assert_eq!(out[1].header.sequence_number, 11);
        assert_eq!(out[1].header.timestamp, 1160);
        assert!(!out[1].header.marker);
        assert_eq!(out[1].payload.len(), 160);
    }

    #[test]
    fn test_sequencer_wraps() {
        let mut last = None;
        let mut sequencer = RtpSequencer::with_params(1, u16::MAX, u32::MAX - 10, |packet| {
            last = Some(packet.header);
            Ok(())
        });

        sequencer.emit(audio_packet(20, false)).unwrap();
        assert_eq!(sequencer.sequence_number(), 0);
        drop(sequencer);

        let header = last.unwrap();
        assert_eq!(header.sequence_number, u16::MAX);
        assert_eq!(header.timestamp, 9);
    }

    #[test]
    fn test_sequencer_random_session() {
        let sequencer = RtpSequencer::new(|_packet| Ok(()));
        let other = RtpSequencer::new(|_packet| Ok(()));

        // two random 32-bit SSRCs colliding is vanishingly unlikely
        assert_ne!(
            (sequencer.ssrc(), sequencer.timestamp_base()),
            (other.ssrc(), other.timestamp_base())
        );
    }

    #[test]
    fn test_framed_packet_serializes() {
        let mut wire = Vec::new();
        let mut sequencer = RtpSequencer::with_params(7, 0, 0, |packet: RtpPacket| {
            wire.push(packet.to_bytes());
            Ok(())
        });

        sequencer.emit(audio_packet(80, true)).unwrap();
        drop(sequencer);

        let parsed = RtpPacket::from_bytes(&wire[0]).unwrap();
        assert_eq!(parsed.header.timestamp, 80);
        assert!(parsed.header.marker);
        assert_eq!(parsed.payload.len(), 160);
    }
}
