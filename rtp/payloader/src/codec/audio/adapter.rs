//! Accumulation buffer for partial audio data
//!
//! Holds pushed chunks in arrival order without copying them and remembers
//! the timestamp of the chunk at the head of the queue together with how many
//! bytes have been flushed since that chunk started. The payloader uses that
//! pair to extrapolate the timestamp of a packet that begins mid-chunk.

use crate::codec::clock::ClockTime;
use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;

struct PendingChunk {
    data: Bytes,
    timestamp: Option<ClockTime>,
}

/// Ordered byte queue with head-timestamp bookkeeping.
#[derive(Default)]
pub struct AudioAdapter {
    chunks: VecDeque<PendingChunk>,
    /// Bytes already consumed from the front chunk
    skip: usize,
    available: usize,
    timestamp: Option<ClockTime>,
    /// Bytes flushed since `timestamp` was recorded
    distance: u64,
}

impl AudioAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data`; a chunk entering an empty buffer sets the head timestamp.
    pub fn push(&mut self, data: Bytes, timestamp: Option<ClockTime>) {
        if data.is_empty() {
            return;
        }
        if self.available == 0 {
            self.update_timestamp(timestamp);
        }
        self.available += data.len();
        self.chunks.push_back(PendingChunk { data, timestamp });
    }

    /// Number of buffered bytes.
    pub fn available(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Copies `len` bytes starting `offset` bytes past the head, without
    /// consuming them. The range is clipped to what is available.
    pub fn copy(&self, offset: usize, len: usize) -> Bytes {
        let end = offset.saturating_add(len).min(self.available);
        if offset >= end {
            return Bytes::new();
        }

        let mut out = BytesMut::with_capacity(end - offset);
        let mut position = 0;
        for (index, chunk) in self.chunks.iter().enumerate() {
            let data = if index == 0 {
                &chunk.data[self.skip..]
            } else {
                &chunk.data[..]
            };
            let chunk_end = position + data.len();
            if chunk_end > offset {
                let from = offset.saturating_sub(position);
                let to = data.len().min(end - position);
                out.extend_from_slice(&data[from..to]);
            }
            position = chunk_end;
            if position >= end {
                break;
            }
        }
        out.freeze()
    }

    /// Removes up to `len` bytes from the head.
    pub fn flush(&mut self, len: usize) {
        let mut remaining = len.min(self.available);
        self.available -= remaining;

        while remaining > 0 {
            let Some(front) = self.chunks.front() else {
                break;
            };
            let left_in_chunk = front.data.len() - self.skip;
            if remaining < left_in_chunk {
                self.skip += remaining;
                self.distance += remaining as u64;
                break;
            }

            remaining -= left_in_chunk;
            self.distance += left_in_chunk as u64;
            self.skip = 0;
            self.chunks.pop_front();
            if let Some(next) = self.chunks.front() {
                let timestamp = next.timestamp;
                self.update_timestamp(timestamp);
            }
        }
    }

    /// Copies and removes `len` bytes from the head.
    ///
    /// When the head chunk alone covers the request the bytes are shared
    /// rather than copied.
    pub fn take(&mut self, len: usize) -> Bytes {
        let len = len.min(self.available);
        let data = match self.chunks.front() {
            Some(front) if front.data.len() - self.skip >= len => {
                front.data.slice(self.skip..self.skip + len)
            }
            _ => self.copy(0, len),
        };
        self.flush(len);
        data
    }

    /// Head timestamp and bytes flushed since it was recorded.
    ///
    /// A fresh or cleared buffer reports `(None, 0)`.
    pub fn prev_timestamp(&self) -> (Option<ClockTime>, u64) {
        (self.timestamp, self.distance)
    }

    /// Drops all pending bytes and timestamp bookkeeping.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.skip = 0;
        self.available = 0;
        self.timestamp = None;
        self.distance = 0;
    }

    /// Hands over every pending byte and clears the buffer.
    pub fn drain(&mut self) -> Bytes {
        let data = self.take(self.available);
        self.clear();
        data
    }

    fn update_timestamp(&mut self, timestamp: Option<ClockTime>) {
        if let Some(timestamp) = timestamp {
            self.timestamp = Some(timestamp);
            self.distance = 0;
        }
    }
}
