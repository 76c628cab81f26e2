use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::ProtocolError;

/// The single request a host sends at process start.
///
/// Node and edge descriptors are opaque JSON owned by the host, either objects or
/// pre-encoded strings. The bridge only embeds them in the prompt and never inspects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// The user's natural-language instruction
    pub prompt: String,

    /// Node descriptors of the current graph
    #[serde(default)]
    pub nodes: Vec<Value>,

    /// Edge descriptors of the current graph
    #[serde(default)]
    pub edges: Vec<Value>,

    /// Capability catalog: one `signature: description` line per constructible node
    #[serde(default)]
    pub plugin: Vec<String>,

    /// Provider credentials and sampling settings
    pub config: RequestConfig,
}

/// Per-request provider settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Provider API key
    pub key: String,

    /// Model override; falls back to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Temperature override; falls back to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

// The key must never end up in logs through a stray `{:?}`.
impl std::fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestConfig")
            .field("key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Request {
    /// Decode a framed payload.
    pub fn from_payload(payload: &str) -> Result<Self, ProtocolError> {
        if payload.trim().is_empty() {
            return Err(ProtocolError::EmptyRequest);
        }
        serde_json::from_str(payload).map_err(ProtocolError::MalformedRequest)
    }
}
