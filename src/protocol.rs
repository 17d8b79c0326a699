//! Peer-to-peer message vocabulary and the channel contract the networked
//! turn coordinator consumes.

/// Messages exchanged between peers during play.
///
/// The wire vocabulary is deliberately tiny: a shot request, the hit/miss
/// result for the most recent shot, and a disconnect notice. Anything else a
/// transport might carry is its own concern and never reaches the
/// coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Fire at the receiver's board.
    Shot { row: u8, col: u8 },
    /// Outcome of the sender's most recently received shot.
    Result { hit: bool },
    /// The sender is gone. Also synthesized locally when the wire dies.
    Disconnect,
}

/// The channel to the peer went away under us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClosed;

impl core::fmt::Display for ChannelClosed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "peer channel closed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelClosed {}

/// Non-blocking message channel to the remote peer.
///
/// The coordinator polls `try_recv` once per tick and never blocks;
/// "waiting" for a result is external polling, not suspension. Transports
/// implement this over whatever framing they like.
pub trait PeerChannel {
    fn send(&mut self, msg: Message) -> Result<(), ChannelClosed>;
    fn try_recv(&mut self) -> Option<Message>;
}
