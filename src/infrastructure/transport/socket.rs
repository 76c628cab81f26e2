use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::domain::errors::TransportError;
use crate::domain::ports::Transport;

/// Send-only TCP transport.
///
/// This variant can only write to the host. [`Transport::receive`] always fails with
/// [`TransportError::UnsupportedOperation`]: there is no inbound framing on the socket,
/// so a run using it reports that failure as its single `error` envelope instead of
/// waiting on a reply that can never be read.
pub struct SocketTransport {
    stream: TcpStream,
    peer: String,
}

impl SocketTransport {
    /// Connect to the host's listening socket.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        let peer = format!("{host}:{port}");
        info!(peer = %peer, "connected socket transport");
        Ok(Self { stream, peer })
    }

    /// Address this transport is connected to.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        debug!(peer = %self.peer, bytes = text.len(), "sending to host");
        self.stream.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.stream.write_all(b"\n").await?;
        }
        self.stream.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<String, TransportError> {
        Err(TransportError::UnsupportedOperation(
            "receive is not available on the send-only socket transport",
        ))
    }
}
