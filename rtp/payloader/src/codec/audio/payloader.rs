//! CBR audio slicing engine
//!
//! Incoming chunks either pass straight through (nothing is buffered and the
//! chunk already has a legal size) or are appended to the [`AudioAdapter`]
//! and carved into the largest aligned packets the transport allows. Bytes
//! that do not yet make a minimum-size packet wait for the next chunk, a
//! discontinuity, or end of stream.
//!
//! Timestamps of packets cut from the middle of a chunk are extrapolated from
//! the head chunk's timestamp plus the duration of the bytes already flushed
//! from it. The running byte offset gives each packet its RTP time offset.

use super::adapter::AudioAdapter;
use super::geometry::{GeometryMode, PayloadGeometry, PayloadLengths};
use super::packet::{AudioChunk, AudioPacket};
use crate::codec::clock::{ClockTime, align_down};
use crate::config::TransportConstraints;
use crate::error::{PayloaderError, Result};
use crate::traits::PacketSink;
use bytes::Bytes;
use logging::{LogLevel, Logger};

/// How much of the buffer an explicit flush should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushLength {
    /// Everything currently buffered
    All,
    /// At most this many bytes
    Bytes(usize),
}

/// Lifecycle of a payloader instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloaderState {
    /// No geometry set yet; data is rejected
    Unconfigured,
    /// Geometry set, no data handled since creation or last reset
    Configured,
    /// At least one chunk handled
    Active,
}

/// Slices CBR audio into RTP-sized packets and hands them to a sink.
///
/// Not internally synchronized: callers feed one chunk at a time.
pub struct AudioPayloader<S: PacketSink> {
    geometry: Option<PayloadGeometry>,
    constraints: TransportConstraints,
    adapter: AudioAdapter,
    /// Bytes emitted since the stream session started
    offset: u64,
    discont: bool,
    state: PayloaderState,
    sink: S,
    logger: Logger,
}

impl<S: PacketSink> AudioPayloader<S> {
    /// Create a new, unconfigured payloader
    ///
    /// # Arguments
    /// * `constraints` - Transport limits, re-read on every chunk
    /// * `sink` - Receives every finished packet
    /// * `logger` - Logger for payloader diagnostics
    pub fn new(constraints: TransportConstraints, sink: S, logger: Logger) -> Self {
        AudioPayloader {
            geometry: None,
            constraints,
            adapter: AudioAdapter::new(),
            offset: 0,
            discont: false,
            state: PayloaderState::Unconfigured,
            sink,
            logger,
        }
    }

    /// Configures frame-based payloading.
    ///
    /// Pending bytes are dropped since they were cut for the old geometry.
    ///
    /// # Errors
    /// `ModeMismatch` if the payloader is already sample-based.
    pub fn set_frame_geometry(&mut self, frame_size: usize, frame_duration_ms: u32) -> Result<()> {
        self.set_geometry(PayloadGeometry::frame(frame_size, frame_duration_ms))
    }

    /// Configures sample-based payloading with `sample_bits` bits per sample.
    ///
    /// # Errors
    /// `ModeMismatch` if the payloader is already frame-based.
    pub fn set_sample_geometry(&mut self, sample_bits: u32) -> Result<()> {
        self.set_geometry(PayloadGeometry::sample(sample_bits))
    }

    /// Same as [`set_sample_geometry`](Self::set_sample_geometry) with the
    /// sample size given in whole bytes.
    pub fn set_sample_geometry_bytes(&mut self, sample_bytes: u32) -> Result<()> {
        self.set_sample_geometry(sample_bytes.saturating_mul(8))
    }

    fn set_geometry(&mut self, geometry: PayloadGeometry) -> Result<()> {
        if let Some(current) = self.geometry
            && current.mode() != geometry.mode()
        {
            let err = PayloaderError::ModeMismatch {
                current: current.mode(),
                requested: geometry.mode(),
            };
            self.logger.error(&err.to_string());
            return Err(err);
        }

        if !self.adapter.is_empty() {
            self.logger.debug(&format!(
                "dropping {} pending bytes on geometry change",
                self.adapter.available()
            ));
        }
        self.adapter.clear();
        self.geometry = Some(geometry);
        if self.state == PayloaderState::Unconfigured {
            self.state = PayloaderState::Configured;
        }

        self.logger.debug(&match geometry {
            PayloadGeometry::Frame {
                frame_size,
                frame_duration_ms,
            } => format!(
                "frame set to {} ms and size {}",
                frame_duration_ms, frame_size
            ),
            PayloadGeometry::Sample {
                sample_bits,
                fragment_size,
            } => format!(
                "sample size set to {} bits, fragment size {} bytes",
                sample_bits, fragment_size
            ),
        });
        Ok(())
    }

    pub fn geometry(&self) -> Option<&PayloadGeometry> {
        self.geometry.as_ref()
    }

    pub fn mode(&self) -> Option<GeometryMode> {
        self.geometry.map(|geometry| geometry.mode())
    }

    pub fn constraints(&self) -> &TransportConstraints {
        &self.constraints
    }

    /// Mutable access for renegotiation; takes effect on the next chunk.
    pub fn constraints_mut(&mut self) -> &mut TransportConstraints {
        &mut self.constraints
    }

    pub fn set_constraints(&mut self, constraints: TransportConstraints) {
        self.constraints = constraints;
    }

    pub fn state(&self) -> PayloaderState {
        self.state
    }

    /// Bytes buffered but not yet emitted.
    pub fn pending_bytes(&self) -> usize {
        self.adapter.available()
    }

    /// Drops buffered bytes without emitting them.
    pub fn clear_buffer(&mut self) {
        self.adapter.clear();
    }

    /// Takes ownership of all buffered bytes, leaving the buffer empty.
    pub fn drain_pending_bytes(&mut self) -> Bytes {
        self.adapter.drain()
    }

    /// Running time offset the next packet will carry.
    pub fn next_rtp_offset(&self) -> Option<u32> {
        self.geometry
            .map(|geometry| geometry.rtp_time(self.offset, self.constraints.clock_rate))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Legal payload lengths under the current geometry and constraints.
    pub fn payload_lengths(&self) -> Result<PayloadLengths> {
        self.configured_geometry()?.lengths(&self.constraints)
    }

    /// Packetizes one chunk of audio.
    ///
    /// A discontinuous chunk first flushes whatever is buffered and marks the
    /// next emitted packet. Residual bytes below the minimum payload length
    /// stay buffered.
    ///
    /// # Errors
    /// Configuration errors drop the chunk; sink errors abort slicing with
    /// already emitted packets left emitted.
    pub fn handle_chunk(&mut self, chunk: AudioChunk) -> Result<()> {
        if let Err(err) = self.configured_geometry() {
            self.logger
                .error(&format!("dropping {}-byte chunk: {}", chunk.len(), err));
            return Err(err);
        }

        if chunk.discont {
            self.logger.debug("got discontinuity");
            let flushed = self.flush(FlushLength::All, None);
            self.discont = true;
            flushed?;
        }

        let lengths = match self.payload_lengths() {
            Ok(lengths) => lengths,
            Err(err) => {
                self.logger
                    .error(&format!("dropping {}-byte chunk: {}", chunk.len(), err));
                return Err(err);
            }
        };
        self.state = PayloaderState::Active;

        let size = chunk.len();
        let mut available = self.adapter.available();
        self.logger.debug(&format!(
            "got chunk size {}, available {}, min {} max {} align {}",
            size, available, lengths.min, lengths.max, lengths.align
        ));

        if available == 0 && (lengths.min..=lengths.max).contains(&size) {
            self.logger.debug("fast packet push");
            return self.push_packet(chunk.data, chunk.timestamp);
        }

        self.adapter.push(chunk.data, chunk.timestamp);
        available += size;

        while available >= lengths.min {
            let payload_len = align_down(available, lengths.align).min(lengths.max);
            self.flush(FlushLength::Bytes(payload_len), None)?;
            available -= payload_len;
        }

        if self.logger.enabled(LogLevel::Trace) {
            self.logger
                .trace(&format!("{} bytes left buffered", self.adapter.available()));
        }
        Ok(())
    }

    /// Emits buffered bytes as one packet, bypassing the minimum length.
    ///
    /// With `timestamp` set to `None` the timestamp is derived from the
    /// buffer. Flushing an empty buffer is a no-op.
    pub fn flush(&mut self, len: FlushLength, timestamp: Option<ClockTime>) -> Result<()> {
        let available = self.adapter.available();
        let payload_len = match len {
            FlushLength::All => available,
            FlushLength::Bytes(len) => len.min(available),
        };
        if payload_len == 0 {
            return Ok(());
        }

        let timestamp = match timestamp {
            Some(timestamp) => Some(timestamp),
            None => self.buffered_timestamp()?,
        };

        let payload = self.adapter.take(payload_len);
        self.push_packet(payload, timestamp)
    }

    /// Timestamp of the byte at the head of the buffer.
    fn buffered_timestamp(&self) -> Result<Option<ClockTime>> {
        let (timestamp, distance) = self.adapter.prev_timestamp();
        if self.logger.enabled(LogLevel::Trace) {
            self.logger.trace(&format!(
                "last timestamp {:?}, distance {}",
                timestamp, distance
            ));
        }

        match timestamp {
            Some(timestamp) if distance > 0 => {
                let geometry = self.configured_geometry()?;
                let elapsed = geometry.duration(distance, self.constraints.clock_rate);
                Ok(Some(timestamp.saturating_add(elapsed)))
            }
            other => Ok(other),
        }
    }

    /// Builds a packet around `payload` and hands it to the sink.
    fn push_packet(&mut self, payload: Bytes, timestamp: Option<ClockTime>) -> Result<()> {
        let geometry = self.configured_geometry()?;
        let payload_len = payload.len();

        let discont = std::mem::take(&mut self.discont);
        if discont {
            self.logger.debug("setting marker and discont");
        }

        let packet = AudioPacket {
            payload_type: self.constraints.payload_type,
            marker: discont,
            discont,
            timestamp,
            rtp_offset: geometry.rtp_time(self.offset, self.constraints.clock_rate),
            payload,
        };
        self.offset += payload_len as u64;

        if self.logger.enabled(LogLevel::Trace) {
            self.logger.trace(&format!(
                "pushing {} bytes ts {:?} rtp offset {}",
                payload_len, packet.timestamp, packet.rtp_offset
            ));
        }

        self.sink.emit(packet).inspect_err(|err| {
            self.logger.warn(&format!("sink rejected packet: {}", err));
        })
    }

    fn configured_geometry(&self) -> Result<PayloadGeometry> {
        let geometry = self.geometry.ok_or(PayloaderError::Unconfigured)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Marks the next emitted packet as discontinuous after flushing what is
    /// buffered, as if a discontinuous empty chunk had arrived.
    pub fn on_discontinuity(&mut self) -> Result<()> {
        self.logger.debug("discontinuity signalled");
        let flushed = self.flush(FlushLength::All, None);
        self.discont = true;
        flushed
    }

    /// Emits every remaining buffered byte.
    pub fn on_end_of_stream(&mut self) -> Result<()> {
        self.logger.debug(&format!(
            "end of stream, flushing {} bytes",
            self.adapter.available()
        ));
        self.flush(FlushLength::All, None)
    }

    /// Drops buffered bytes after an upstream flush; the session continues.
    pub fn on_flush_stop(&mut self) {
        self.adapter.clear();
    }

    /// Ends the stream session: clears the buffer, the running offset and the
    /// discontinuity flag. Geometry and constraints are kept.
    pub fn on_reset(&mut self) {
        self.adapter.clear();
        self.offset = 0;
        self.discont = false;
        self.state = match self.geometry {
            Some(_) => PayloaderState::Configured,
            None => PayloaderState::Unconfigured,
        };
        self.logger.debug("reset");
    }
}
