//! RTP fixed header and packet serialization
//!
//! Implements the fixed header of RFC 3550 Section 5.1. The payloader itself
//! never touches wire bytes; this module is used by [`RtpSequencer`] and to
//! translate an MTU into the payload capacity of one packet.
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |V=2|P|X|  CC   |M|     PT      |       Sequence Number         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           Timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           SSRC (Synchronization Source)                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |            CSRC list (0-15 items, 4 bytes each)               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! [`RtpSequencer`]: crate::codec::sequencer::RtpSequencer

use crate::error::{PayloaderError, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// Size of the fixed RTP header without CSRCs or extensions.
pub const RTP_HEADER_SIZE: usize = 12;

const RTP_VERSION: u8 = 2;

/// Payload bytes that fit in one packet of `mtu` bytes (no CSRCs, no padding).
pub fn payload_capacity(mtu: usize) -> usize {
    mtu.saturating_sub(RTP_HEADER_SIZE)
}

fn parse_u16_be(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn parse_u32_be(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// RTP packet header according to RFC 3550.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeader {
    /// RTP version (always 2)
    pub version: u8,
    pub padding: bool,
    pub extension: bool,
    /// CSRC count (0-15)
    pub csrc_count: u8,
    /// Marker bit; audio payloaders set it on the first packet after a gap
    pub marker: bool,
    /// Payload type (0-127)
    pub payload_type: u8,
    pub sequence_number: u16,
    /// Timestamp in clock-rate units
    pub timestamp: u32,
    pub ssrc: u32,
}

impl RtpHeader {
    /// Creates a version 2 header with zero sequence number and timestamp.
    pub fn new(payload_type: u8, ssrc: u32) -> Self {
        RtpHeader {
            version: RTP_VERSION,
            padding: false,
            extension: false,
            csrc_count: 0,
            marker: false,
            payload_type: payload_type & 0x7F,
            sequence_number: 0,
            timestamp: 0,
            ssrc,
        }
    }

    /// Writes the 12-byte fixed header.
    pub fn write_to(&self, buf: &mut BytesMut) {
        // V(2) P(1) X(1) CC(4)
        buf.put_u8(
            (self.version << 6)
                | ((self.padding as u8) << 5)
                | ((self.extension as u8) << 4)
                | (self.csrc_count & 0x0F),
        );
        // M(1) PT(7)
        buf.put_u8(((self.marker as u8) << 7) | (self.payload_type & 0x7F));
        buf.put_u16(self.sequence_number);
        buf.put_u32(self.timestamp);
        buf.put_u32(self.ssrc);
    }

    /// Parses the fixed header.
    ///
    /// # Errors
    /// Fails when fewer than 12 bytes are given or the version is not 2.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < RTP_HEADER_SIZE {
            return Err(PayloaderError::Rtp(format!(
                "header too short: {} bytes",
                data.len()
            )));
        }

        let version = (data[0] >> 6) & 0x03;
        if version != RTP_VERSION {
            return Err(PayloaderError::Rtp(format!(
                "unsupported version {}",
                version
            )));
        }

        Ok(RtpHeader {
            version,
            padding: (data[0] >> 5) & 0x01 == 1,
            extension: (data[0] >> 4) & 0x01 == 1,
            csrc_count: data[0] & 0x0F,
            marker: (data[1] >> 7) & 0x01 == 1,
            payload_type: data[1] & 0x7F,
            sequence_number: parse_u16_be(data, 2),
            timestamp: parse_u32_be(data, 4),
            ssrc: parse_u32_be(data, 8),
        })
    }

    /// Header length including the CSRC list.
    fn encoded_len(&self) -> usize {
        RTP_HEADER_SIZE + 4 * self.csrc_count as usize
    }
}

/// Complete RTP packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpPacket {
    pub header: RtpHeader,
    pub payload: Bytes,
}

impl RtpPacket {
    pub fn new(header: RtpHeader, payload: Bytes) -> Self {
        RtpPacket { header, payload }
    }

    /// Serializes header and payload into one contiguous buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(RTP_HEADER_SIZE + self.payload.len());
        self.header.write_to(&mut buf);
        buf.extend_from_slice(&self.payload);
        buf.freeze()
    }

    /// Parses a packet, skipping any CSRC list.
    pub fn from_bytes(data: &Bytes) -> Result<Self> {
        let header = RtpHeader::from_bytes(data)?;
        let start = header.encoded_len();
        if data.len() < start {
            return Err(PayloaderError::Rtp(format!(
                "CSRC list truncated: need {} bytes, have {}",
                start,
                data.len()
            )));
        }
        Ok(RtpPacket {
            header,
            payload: data.slice(start..),
        })
    }
}
