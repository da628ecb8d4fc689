//! Input chunks and output packets of the audio payloader

use crate::codec::clock::ClockTime;
use bytes::Bytes;

/// A piece of encoded audio handed to the payloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub data: Bytes,
    /// Presentation time of the first byte, if known
    pub timestamp: Option<ClockTime>,
    /// Set when data was lost or skipped before this chunk
    pub discont: bool,
}

impl AudioChunk {
    pub fn new(data: impl Into<Bytes>, timestamp: Option<ClockTime>) -> Self {
        AudioChunk {
            data: data.into(),
            timestamp,
            discont: false,
        }
    }

    /// Marks the chunk as following a gap in the stream.
    pub fn with_discont(mut self) -> Self {
        self.discont = true;
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A payload ready for RTP framing.
///
/// Carries everything the transport layer needs besides SSRC and sequence
/// number, which belong to the RTP session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPacket {
    pub payload_type: u8,
    /// RTP marker bit, set on the first packet after a discontinuity
    pub marker: bool,
    pub discont: bool,
    /// Presentation time of the first payload byte
    pub timestamp: Option<ClockTime>,
    /// Position of the first payload byte in RTP clock units, relative to the
    /// start of the stream session
    pub rtp_offset: u32,
    pub payload: Bytes,
}

impl AudioPacket {
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_chunk_builders() {
        let chunk = AudioChunk::new(vec![1u8, 2, 3], Some(40));

        assert_eq!(chunk.len(), 3);
        assert!(!chunk.discont);
        assert!(chunk.clone().with_discont().discont);
        assert!(AudioChunk::new(Bytes::new(), None).is_empty());
    }
}
