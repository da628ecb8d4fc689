//! Codec module - RTP framing, clock arithmetic and the audio payloader

pub mod audio;
pub mod clock;
pub mod rtp;
pub mod sequencer;

pub use audio::{
    AudioAdapter, AudioChunk, AudioPacket, AudioPayloader, FlushLength, GeometryMode,
    PayloadGeometry, PayloadLengths, PayloaderState,
};
pub use clock::ClockTime;
pub use rtp::{RtpHeader, RtpPacket};
pub use sequencer::RtpSequencer;
