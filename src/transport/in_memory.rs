//! In-process wire pair for tests and same-terminal play.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{WireRecv, WireSend};
use crate::protocol::Message;

pub struct InMemorySend {
    tx: UnboundedSender<Message>,
}

pub struct InMemoryRecv {
    rx: UnboundedReceiver<Message>,
}

/// Two connected endpoints; what one sends the other receives, in order.
pub fn pair() -> ((InMemorySend, InMemoryRecv), (InMemorySend, InMemoryRecv)) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (
        (InMemorySend { tx: a_tx }, InMemoryRecv { rx: a_rx }),
        (InMemorySend { tx: b_tx }, InMemoryRecv { rx: b_rx }),
    )
}

#[async_trait::async_trait]
impl WireSend for InMemorySend {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow::anyhow!("channel closed"))
    }
}

#[async_trait::async_trait]
impl WireRecv for InMemoryRecv {
    async fn recv(&mut self) -> anyhow::Result<Message> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("channel closed"))
    }
}
