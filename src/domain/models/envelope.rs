//! Envelopes are the discrete JSON messages written to the host.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One outbound message, discriminated by its `type` field.
///
/// `function` is the only non-terminal kind. A run emits any number of `function`
/// envelopes followed by exactly one of `response`, `error` or `exit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    /// Ask the host to perform a graph mutation and answer with a frame.
    Function {
        name: String,
        args: Map<String, Value>,
    },

    /// Final answer plus the run transcript.
    Response {
        message: String,
        #[serde(default)]
        logs: Vec<String>,
    },

    /// Failure report. `error` carries the diagnostic, `message` is shown to the user.
    Error { error: String, message: String },

    /// Final answer for hosts that expect the legacy `exit` reply.
    Exit {
        message: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        logs: Vec<String>,
    },
}

impl Envelope {
    /// Returns true for kinds that end a run.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Function { .. })
    }

    /// Wire name of the kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Function { .. } => "function",
            Self::Response { .. } => "response",
            Self::Error { .. } => "error",
            Self::Exit { .. } => "exit",
        }
    }
}
