//! Seams between the payloader and its collaborators

use crate::codec::audio::AudioPacket;
use crate::error::Result;

/// Downstream consumer of finished packets.
///
/// Ownership of each packet moves into the sink. An `Err` aborts the
/// payloader's current operation and is returned to its caller unchanged.
pub trait PacketSink {
    fn emit(&mut self, packet: AudioPacket) -> Result<()>;
}

impl<F> PacketSink for F
where
    F: FnMut(AudioPacket) -> Result<()>,
{
    fn emit(&mut self, packet: AudioPacket) -> Result<()> {
        self(packet)
    }
}

/// Collects packets in memory.
impl PacketSink for Vec<AudioPacket> {
    fn emit(&mut self, packet: AudioPacket) -> Result<()> {
        self.push(packet);
        Ok(())
    }
}
