use async_trait::async_trait;

use crate::domain::errors::TransportError;
use crate::domain::models::Envelope;

/// Port for the duplex channel to the host.
///
/// Methods take `&mut self`: whoever holds the transport holds the channel, so a
/// second call cannot be issued while one is outstanding. One instance exists per
/// process and is passed down explicitly from `main`.
///
/// Implementations that cannot read (the socket variant) return
/// [`TransportError::UnsupportedOperation`] from [`Transport::receive`].
#[async_trait]
pub trait Transport: Send {
    /// Write already-encoded text and flush it before returning.
    async fn send_text(&mut self, text: &str) -> Result<(), TransportError>;

    /// Block until the next complete frame arrives and return its payload.
    async fn receive(&mut self) -> Result<String, TransportError>;

    /// Encode an envelope as JSON and send it.
    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        let text = serde_json::to_string(envelope)?;
        self.send_text(&text).await
    }
}
