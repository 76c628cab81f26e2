//! Standard-stream transport: frames in on stdin, one JSON envelope per line out on
//! stdout. Logging must never write to stdout while this transport is in use.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::debug;

use super::framer::Framer;
use crate::domain::errors::TransportError;
use crate::domain::models::ChannelConfig;
use crate::domain::ports::Transport;

/// Transport over the process's standard streams.
pub type StdioTransport = StreamTransport<BufReader<Stdin>, Stdout>;

/// Transport over any buffered reader / writer pair.
pub struct StreamTransport<R, W> {
    framer: Framer<R>,
    writer: W,
    receive_timeout: Option<Duration>,
}

impl StdioTransport {
    /// Bind to this process's stdin and stdout.
    pub fn stdio(channel: &ChannelConfig) -> Self {
        Self::with_streams(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), channel)
    }
}

impl<R, W> StreamTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Build a transport over arbitrary streams.
    pub fn with_streams(reader: R, writer: W, channel: &ChannelConfig) -> Self {
        let receive_timeout = (channel.receive_timeout_secs > 0)
            .then(|| Duration::from_secs(channel.receive_timeout_secs));

        Self {
            framer: Framer::new(reader).strict(channel.strict_framing),
            writer,
            receive_timeout,
        }
    }

    /// Override the receive bound; `None` waits forever.
    #[must_use]
    pub fn with_receive_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.receive_timeout = timeout;
        self
    }
}

#[async_trait]
impl<R, W> Transport for StreamTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        debug!(bytes = text.len(), "sending to host");
        self.writer.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        // The host may be blocked on exactly this output.
        self.writer.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<String, TransportError> {
        let payload = match self.receive_timeout {
            Some(limit) => tokio::time::timeout(limit, self.framer.read_frame())
                .await
                .map_err(|_| TransportError::ChannelTimeout(limit))??,
            None => self.framer.read_frame().await?,
        };
        debug!(bytes = payload.len(), "received frame from host");
        Ok(payload)
    }
}
