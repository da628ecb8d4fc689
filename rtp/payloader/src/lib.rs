//! Constant-bitrate audio RTP payloader
//!
//! Slices a continuous stream of CBR audio into RTP-sized packets that respect
//! the MTU, the negotiated packet-time bounds, and the codec's frame or sample
//! alignment. Codec adapters only describe their geometry; buffering, slicing
//! and timestamping live here.

pub mod codec;
pub mod config;
pub mod error;
pub mod traits;

pub use codec::{
    AudioAdapter, AudioChunk, AudioPacket, AudioPayloader, ClockTime, FlushLength,
    GeometryMode, PayloadGeometry, PayloadLengths, PayloaderState, RtpHeader, RtpPacket,
    RtpSequencer,
};
pub use config::{LoggingConfig, PayloaderConfig, TransportConfig, TransportConstraints};
pub use error::{PayloaderError, Result};
pub use traits::PacketSink;
