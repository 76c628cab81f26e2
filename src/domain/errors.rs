//! Error taxonomy for the bridge.
//!
//! Tool-level failures reported by the host are *not* errors here: they are ordinary
//! response text handed to the reasoning engine. Everything in this module is either
//! a channel failure, a decode failure, or a provider failure, and all of them end the
//! run with a single `error` envelope.

use std::time::Duration;
use thiserror::Error;

/// Failures of the duplex channel to the host.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The inbound stream ended before any payload arrived.
    #[error("Channel closed by host")]
    ChannelClosed,

    /// No complete frame arrived within the configured bound.
    #[error("Timed out after {0:?} waiting for a frame from the host")]
    ChannelTimeout(Duration),

    /// The transport variant does not support this operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The inbound stream ended after a partial payload but before the sentinel line.
    #[error("Incomplete frame: stream closed after {received_bytes} bytes without a terminator")]
    IncompleteFrame { received_bytes: usize },

    /// Envelope could not be encoded for sending.
    #[error("Failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    /// Underlying read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A framed payload did not decode into the expected shape.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed request payload: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("Request payload was empty")]
    EmptyRequest,
}

/// Failures raised by the reasoning engine or its provider.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// Provider rejected the credential.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Provider returned an error that is not worth retrying.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered, but the answer could not be interpreted.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Engine could not be constructed from the request and configuration.
    #[error("Engine configuration error: {0}")]
    Configuration(String),
}

impl ReasoningError {
    /// Returns true for credential failures, which get a fixed user-facing message.
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// A tool call issued by the model that cannot be turned into a host command.
///
/// These never reach the host. The rendered message is returned to the engine as the
/// tool observation so the model can correct itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0} is not a valid tool, try one of [{available}].", available = crate::domain::models::GraphCommand::TOOL_NAMES.join(", "))]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}. Please fix the arguments and try again.")]
    InvalidArguments { tool: String, reason: String },
}

/// Anything that terminates a bridge run.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    /// The run panicked; the payload is the panic message when one was available.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
