//! Instruction template for the agent loop.

use serde_json::Value;

use crate::domain::models::Request;
use crate::domain::ports::ChatMessage;

/// Behaviour rules handed to the model. They are policy text only; nothing here
/// enforces them.
const SYSTEM_RULES: &str = "\
You are an assistant embedded in a node-based image editing application. \
Your only role is to help the user manipulate the node graph by calling the functions you are given. \
If a request does not concern the graph or image editing, remind the user of that role instead of answering.

Rules:
- Only add nodes whose signature appears in the list of available nodes.
- Outputs of nodes can only be connected to inputs of other nodes. Never connect inputs to inputs or outputs to outputs.
- Do not make assumptions about values to plug into functions. Ask for clarification if a request is ambiguous.
- Your very final response must be a one sentence summary without any JSON.";

/// Renders a [`Request`] into the opening conversation.
pub struct PromptTemplate;

impl PromptTemplate {
    /// System rules followed by a user turn carrying the graph and the instruction.
    pub fn render(request: &Request) -> Vec<ChatMessage> {
        vec![
            ChatMessage::System(SYSTEM_RULES.to_string()),
            ChatMessage::User(Self::render_context(request)),
        ]
    }

    fn render_context(request: &Request) -> String {
        format!(
            "The graph consists of nodes and edges. Each node performs an operation and exposes \
             anchors that edges connect.\n\n\
             Current nodes:\n{nodes}\n\n\
             Current edges:\n{edges}\n\n\
             Available nodes (signature: description):\n{plugins}\n\n\
             The user provides the following prompt:\n{prompt}",
            nodes = bullet_list(request.nodes.iter().map(describe)),
            edges = bullet_list(request.edges.iter().map(describe)),
            plugins = bullet_list(request.plugin.iter().cloned()),
            prompt = request.prompt,
        )
    }
}

/// Strings are embedded raw, anything else as compact JSON.
fn describe(descriptor: &Value) -> String {
    match descriptor {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn bullet_list(items: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = items.map(|item| format!("- {item}")).collect();
    if lines.is_empty() {
        return "(none)".to_string();
    }
    lines.join("\n")
}
