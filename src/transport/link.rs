//! Background pump between the wire and the coordinator's polling loop.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use super::{WireRecv, WireSend};
use crate::protocol::{ChannelClosed, Message, PeerChannel};

/// Owns the reader/writer tasks for one peer connection and exposes the
/// synchronous non-blocking channel the turn coordinator polls.
///
/// A dead wire surfaces as a queued [`Message::Disconnect`], never as an
/// error from `try_recv`.
pub struct PeerLink {
    out_tx: UnboundedSender<Message>,
    in_rx: UnboundedReceiver<Message>,
}

impl PeerLink {
    /// Spawn the reader and writer tasks over a pair of wire endpoints.
    /// Must be called from within a tokio runtime.
    pub fn spawn(mut recv: impl WireRecv + 'static, mut send: impl WireSend + 'static) -> Self {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<Message>();

        let reader_tx = in_tx.clone();
        tokio::spawn(async move {
            loop {
                match recv.recv().await {
                    Ok(msg) => {
                        if reader_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::debug!("wire receive ended: {}", e);
                        let _ = reader_tx.send(Message::Disconnect);
                        break;
                    }
                }
            }
        });

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                if let Err(e) = send.send(msg).await {
                    log::debug!("wire send failed: {}", e);
                    let _ = in_tx.send(Message::Disconnect);
                    break;
                }
            }
        });

        PeerLink { out_tx, in_rx }
    }
}

impl PeerChannel for PeerLink {
    fn send(&mut self, msg: Message) -> Result<(), ChannelClosed> {
        self.out_tx.send(msg).map_err(|_| ChannelClosed)
    }

    fn try_recv(&mut self) -> Option<Message> {
        match self.in_rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Message::Disconnect),
        }
    }
}
