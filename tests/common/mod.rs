//! Common test utilities for integration tests
//!
//! Provides an in-memory host transport, a scripted reasoning engine and request
//! fixtures shared across the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use graph_bridge::domain::errors::{ReasoningError, TransportError};
use graph_bridge::domain::models::{Envelope, Request, RequestConfig, ToolDefinition};
use graph_bridge::domain::ports::{
    ChatMessage, EngineProvider, EngineReply, ReasoningEngine, ToolCall, Transport,
};

/// Ordered record of what crossed the channel and what the engine saw.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// JSON payload of a request with the given prompt and catalog.
pub fn request_payload(prompt: &str, plugin: &[&str]) -> String {
    serde_json::to_string(&Request {
        prompt: prompt.to_string(),
        nodes: vec![],
        edges: vec![],
        plugin: plugin.iter().map(ToString::to_string).collect(),
        config: RequestConfig {
            key: "sk-test".to_string(),
            model: None,
            temperature: None,
        },
    })
    .unwrap()
}

/// In-memory host: hands out queued frames and records every envelope sent.
pub struct HostTransport {
    inbound: VecDeque<String>,
    pub sent: Arc<Mutex<Vec<Envelope>>>,
    events: EventLog,
}

impl HostTransport {
    pub fn new(frames: Vec<String>, events: EventLog) -> Self {
        Self {
            inbound: frames.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for HostTransport {
    async fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let label = match &envelope {
            Envelope::Function { name, .. } => format!("sent {name}"),
            other => format!("sent {}", other.kind()),
        };
        self.events.lock().unwrap().push(label);
        self.sent.lock().unwrap().push(envelope);
        Ok(())
    }

    async fn receive(&mut self) -> Result<String, TransportError> {
        let frame = self.inbound.pop_front().ok_or(TransportError::ChannelClosed)?;
        self.events.lock().unwrap().push(format!("received {}", frame.trim_end()));
        Ok(frame)
    }
}

/// One scripted engine step.
pub enum Step {
    Call { name: String, arguments: String },
    Final(String),
    Fail(ReasoningError),
    Panic,
}

impl Step {
    pub fn call(name: &str, arguments: &str) -> Self {
        Self::Call {
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    pub fn final_answer(text: &str) -> Self {
        Self::Final(text.to_string())
    }
}

/// Shared state between a [`ScriptedProvider`] and the engines it builds.
#[derive(Clone, Default)]
pub struct Script {
    steps: Arc<Mutex<VecDeque<Step>>>,
    /// Conversation passed to each engine call
    pub conversations: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    /// Number of tools offered on each engine call
    pub tool_counts: Arc<Mutex<Vec<usize>>>,
    events: EventLog,
}

impl Script {
    pub fn new(steps: Vec<Step>, events: EventLog) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            events,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }
}

pub struct ScriptedEngine {
    script: Script,
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    async fn next_step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<EngineReply, ReasoningError> {
        if let Some(ChatMessage::Tool { content, .. }) = messages.last() {
            self.script
                .events
                .lock()
                .unwrap()
                .push(format!("engine saw {}", content.trim_end()));
        }
        self.script
            .conversations
            .lock()
            .unwrap()
            .push(messages.to_vec());
        self.script.tool_counts.lock().unwrap().push(tools.len());

        let step = self.script.steps.lock().unwrap().pop_front();
        let seq = self.script.calls();
        match step {
            Some(Step::Call { name, arguments }) => Ok(EngineReply::ToolCall {
                reasoning: None,
                call: ToolCall {
                    id: format!("call_{seq}"),
                    name,
                    arguments,
                },
            }),
            Some(Step::Final(text)) => Ok(EngineReply::Final(text)),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Panic) => panic!("scripted engine failure"),
            None => Ok(EngineReply::Final("script exhausted".to_string())),
        }
    }
}

/// Provider handing out engines that follow a [`Script`].
pub struct ScriptedProvider {
    pub script: Script,
    build_error: Mutex<Option<ReasoningError>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            build_error: Mutex::new(None),
        }
    }

    /// Provider whose engine construction fails.
    pub fn failing(error: ReasoningError) -> Self {
        Self {
            script: Script::default(),
            build_error: Mutex::new(Some(error)),
        }
    }
}

impl EngineProvider for ScriptedProvider {
    fn engine_for(&self, _request: &Request) -> Result<Box<dyn ReasoningEngine>, ReasoningError> {
        if let Some(err) = self.build_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Box::new(ScriptedEngine {
            script: self.script.clone(),
        }))
    }
}

/// Exactly one terminal envelope, and it is the last one.
pub fn assert_single_terminal(sent: &[Envelope]) {
    let terminals = sent.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminals, 1, "expected exactly one terminal envelope: {sent:?}");
    assert!(
        sent.last().is_some_and(Envelope::is_terminal),
        "terminal envelope must come last: {sent:?}"
    );
}
