use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ReasoningError;
use crate::domain::models::{Request, ToolDefinition};

/// A function call emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, echoed back with the observation
    pub id: String,
    pub name: String,
    /// Raw JSON arguments as produced by the model
    pub arguments: String,
}

/// One entry of the conversation the engine reasons over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatMessage {
    System(String),
    User(String),
    Assistant {
        content: Option<String>,
        tool_call: Option<ToolCall>,
    },
    /// Observation returned for a tool call
    Tool { call_id: String, content: String },
}

/// What the engine decided to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    /// Execute exactly one tool call, optionally preceded by reasoning text.
    ToolCall {
        reasoning: Option<String>,
        call: ToolCall,
    },
    /// Final natural-language answer.
    Final(String),
}

/// Port for the chat-completion capability.
///
/// Given the conversation so far and the tools on offer, produce either a single tool
/// invocation or a final answer. An empty `tools` slice asks for a final answer.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn next_step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<EngineReply, ReasoningError>;
}

/// Builds the engine for a request; credentials and sampling settings come from
/// the request itself, so construction happens after the request is read.
pub trait EngineProvider: Send + Sync {
    fn engine_for(&self, request: &Request) -> Result<Box<dyn ReasoningEngine>, ReasoningError>;
}
