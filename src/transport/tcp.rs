//! TCP wire endpoints: length-prefixed bincode frames.

use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use super::{WireRecv, WireSend};
use crate::protocol::Message;

/// Upper bound on a single frame; anything larger is rejected unread.
const MAX_FRAME_LEN: u32 = 64 * 1024;

pub struct TcpSend {
    writer: OwnedWriteHalf,
}

pub struct TcpRecv {
    reader: OwnedReadHalf,
}

/// Split a connected stream into wire endpoints.
pub fn endpoints(stream: TcpStream) -> (TcpRecv, TcpSend) {
    let (reader, writer) = stream.into_split();
    (TcpRecv { reader }, TcpSend { writer })
}

/// Connect to a hosting peer.
pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<(TcpRecv, TcpSend)> {
    let stream = TcpStream::connect(addr).await?;
    Ok(endpoints(stream))
}

/// Accept one joining peer.
pub async fn accept(listener: &TcpListener) -> anyhow::Result<(TcpRecv, TcpSend)> {
    let (stream, peer) = listener.accept().await?;
    log::info!("peer connected from {}", peer);
    Ok(endpoints(stream))
}

fn map_io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe => {
            anyhow::anyhow!("connection closed by peer")
        }
        ErrorKind::ConnectionReset => anyhow::anyhow!("connection reset by peer"),
        _ => anyhow::anyhow!("io error: {}", e),
    }
}

#[async_trait::async_trait]
impl WireSend for TcpSend {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let data = bincode::serialize(&msg)
            .map_err(|e| anyhow::anyhow!("serialization error: {}", e))?;
        if data.len() as u32 > MAX_FRAME_LEN {
            anyhow::bail!("frame too large: {} bytes", data.len());
        }
        let len = (data.len() as u32).to_be_bytes();
        self.writer.write_all(&len).await.map_err(map_io_error)?;
        self.writer.write_all(&data).await.map_err(map_io_error)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl WireRecv for TcpRecv {
    async fn recv(&mut self) -> anyhow::Result<Message> {
        loop {
            let mut len_buf = [0u8; 4];
            self.reader
                .read_exact(&mut len_buf)
                .await
                .map_err(map_io_error)?;
            let len = u32::from_be_bytes(len_buf);
            if len == 0 || len > MAX_FRAME_LEN {
                anyhow::bail!("invalid frame length: {}", len);
            }
            let mut buf = vec![0u8; len as usize];
            self.reader
                .read_exact(&mut buf)
                .await
                .map_err(map_io_error)?;
            match bincode::deserialize(&buf) {
                Ok(msg) => return Ok(msg),
                Err(e) => {
                    // A well-framed message we cannot read is dropped, not
                    // fatal; message integrity is this layer's problem.
                    log::warn!("skipping undecodable frame: {}", e);
                }
            }
        }
    }
}
