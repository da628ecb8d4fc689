//! Audio payloading for constant-bitrate codecs
//!
//! Frame-based codecs (fixed size and duration per frame) and sample-based
//! codecs (fixed bit width per sample) share one slicing engine; only the
//! [`PayloadGeometry`] differs.

mod adapter;
mod geometry;
mod packet;
mod payloader;

pub use adapter::AudioAdapter;
pub use geometry::{GeometryMode, PayloadGeometry, PayloadLengths};
pub use packet::{AudioChunk, AudioPacket};
pub use payloader::{AudioPayloader, FlushLength, PayloaderState};
