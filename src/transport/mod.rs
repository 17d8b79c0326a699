//! Wire plumbing for networked play.
//!
//! The traits are split send/recv so a background reader task and the
//! sending side can run independently; [`link::PeerLink`] pairs them back up
//! behind the synchronous [`crate::PeerChannel`] the coordinator polls.

use crate::protocol::Message;

#[async_trait::async_trait]
pub trait WireSend: Send {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait WireRecv: Send {
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod in_memory;
pub mod link;
pub mod tcp;

pub use link::PeerLink;
