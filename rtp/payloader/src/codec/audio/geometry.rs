//! Payload geometry: how bytes map to packets and time
//!
//! A frame-based codec packs fixed-size, fixed-duration frames; a
//! sample-based codec packs fixed-width samples. Both answer the same three
//! questions: which payload lengths are legal, how long N bytes last, and
//! how many RTP clock ticks N bytes span.

use crate::codec::clock::{
    ClockTime, NSECS_PER_MSEC, NSECS_PER_SEC, align_down, align_up, clamp_len, scale,
};
use crate::codec::rtp::payload_capacity;
use crate::config::TransportConstraints;
use crate::error::{PayloaderError, Result};
use std::fmt;

/// Which geometry family a payloader uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryMode {
    Frame,
    Sample,
}

impl fmt::Display for GeometryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryMode::Frame => write!(f, "frame"),
            GeometryMode::Sample => write!(f, "sample"),
        }
    }
}

/// Legal payload sizes for the current geometry and transport.
///
/// `min` and `max` are both multiples of `align`, and `align <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLengths {
    pub min: usize,
    pub max: usize,
    pub align: usize,
}

/// Codec geometry supplied by the codec adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadGeometry {
    Frame {
        /// Bytes per frame
        frame_size: usize,
        /// Milliseconds per frame
        frame_duration_ms: u32,
    },
    Sample {
        /// Bits per sample
        sample_bits: u32,
        /// Smallest whole number of bytes holding whole samples
        fragment_size: usize,
    },
}

impl PayloadGeometry {
    pub fn frame(frame_size: usize, frame_duration_ms: u32) -> Self {
        PayloadGeometry::Frame {
            frame_size,
            frame_duration_ms,
        }
    }

    /// Sample geometry for `sample_bits`-wide samples.
    ///
    /// The fragment size doubles the bit width until it is byte aligned, so
    /// 12-bit samples travel in 3-byte pairs and 4-bit samples in single bytes.
    pub fn sample(sample_bits: u32) -> Self {
        let mut fragment_bits = sample_bits as u64;
        if fragment_bits != 0 {
            while fragment_bits % 8 != 0 {
                fragment_bits += fragment_bits;
            }
        }
        PayloadGeometry::Sample {
            sample_bits,
            fragment_size: clamp_len(fragment_bits / 8),
        }
    }

    pub fn mode(&self) -> GeometryMode {
        match self {
            PayloadGeometry::Frame { .. } => GeometryMode::Frame,
            PayloadGeometry::Sample { .. } => GeometryMode::Sample,
        }
    }

    /// Rejects zero-sized geometry.
    pub fn validate(&self) -> Result<()> {
        let field = match *self {
            PayloadGeometry::Frame { frame_size: 0, .. } => "frame_size",
            PayloadGeometry::Frame {
                frame_duration_ms: 0,
                ..
            } => "frame_duration",
            PayloadGeometry::Sample { sample_bits: 0, .. } => "sample_size",
            _ => return Ok(()),
        };
        Err(PayloaderError::InvalidGeometry {
            mode: self.mode(),
            field,
        })
    }

    /// Computes the legal payload lengths under `constraints`.
    ///
    /// When the minimum derived from `min_ptime` exceeds the maximum, the
    /// minimum is lowered to the maximum instead of failing.
    pub fn lengths(&self, constraints: &TransportConstraints) -> Result<PayloadLengths> {
        self.validate()?;

        let capacity = payload_capacity(constraints.mtu);
        let (align, max_by_ptime, min_by_ptime) = match *self {
            PayloadGeometry::Frame {
                frame_size,
                frame_duration_ms,
            } => {
                let frame_duration = frame_duration_ms as u64 * NSECS_PER_MSEC;
                let octets =
                    |ptime: ClockTime| clamp_len(scale(frame_size as u64, ptime, frame_duration));
                let max = constraints
                    .max_ptime
                    .map(|ptime| align_down(octets(ptime), frame_size).max(frame_size));
                (frame_size, max, octets(constraints.min_ptime))
            }
            PayloadGeometry::Sample {
                sample_bits,
                fragment_size,
            } => {
                if constraints.clock_rate == 0 {
                    return Err(PayloaderError::InvalidConstraint {
                        field: "clock_rate",
                    });
                }
                // ptime * rate samples, sample_bits / 8 bytes each
                let octets = |ptime: ClockTime| {
                    clamp_len(scale(
                        ptime,
                        constraints.clock_rate as u64 * sample_bits as u64,
                        8 * NSECS_PER_SEC,
                    ))
                };
                let max = constraints
                    .max_ptime
                    .map(|ptime| align_down(octets(ptime), fragment_size).max(fragment_size));
                (fragment_size, max, octets(constraints.min_ptime))
            }
        };

        let max_by_mtu = align_down(capacity, align);
        if max_by_mtu == 0 {
            return Err(PayloaderError::MtuTooSmall { capacity, align });
        }

        let max = max_by_ptime.map_or(max_by_mtu, |ptime| ptime.min(max_by_mtu));
        let min = align_up(min_by_ptime, align).max(align).min(max);

        Ok(PayloadLengths { min, max, align })
    }

    /// Duration represented by `bytes` of payload.
    ///
    /// Frame geometry only counts whole frames and ignores `clock_rate`.
    pub fn duration(&self, bytes: u64, clock_rate: u32) -> ClockTime {
        match *self {
            PayloadGeometry::Frame {
                frame_size,
                frame_duration_ms,
            } => {
                let frames = bytes / frame_size.max(1) as u64;
                frames.saturating_mul(frame_duration_ms as u64 * NSECS_PER_MSEC)
            }
            PayloadGeometry::Sample { sample_bits, .. } => scale(
                bytes,
                8 * NSECS_PER_SEC,
                clock_rate as u64 * sample_bits as u64,
            ),
        }
    }

    /// RTP clock ticks spanned by `bytes` at `clock_rate`.
    ///
    /// Wraps at 32 bits like the RTP timestamp field.
    pub fn rtp_time(&self, bytes: u64, clock_rate: u32) -> u32 {
        match *self {
            PayloadGeometry::Frame { .. } => {
                scale(self.duration(bytes, clock_rate), clock_rate as u64, NSECS_PER_SEC) as u32
            }
            PayloadGeometry::Sample { sample_bits, .. } => {
                (bytes.saturating_mul(8) / sample_bits.max(1) as u64) as u32
            }
        }
    }
}
