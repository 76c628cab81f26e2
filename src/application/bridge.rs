//! One bridge run: read the request, drive the agent loop, answer exactly once.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::agent_loop::{AgentLoop, AgentOutcome};
use super::dispatcher::CommandDispatcher;
use super::error_classifier::ErrorClassifier;
use crate::domain::errors::{BridgeError, BridgeResult, TransportError};
use crate::domain::models::{AgentConfig, Envelope, ReplyKind, Request};
use crate::domain::ports::{EngineProvider, Transport};

/// How a run ended, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// A `response` or `exit` envelope was sent
    Completed,
    /// An `error` envelope was sent
    Failed,
}

/// Orchestrates a single request over an injected transport.
///
/// Whatever happens inside the run, including a panic, exactly one terminal
/// envelope is written. Only a failure to write that envelope surfaces as `Err`.
pub struct Bridge<P> {
    provider: P,
    agent: AgentConfig,
}

impl<P: EngineProvider> Bridge<P> {
    pub const fn new(provider: P, agent: AgentConfig) -> Self {
        Self { provider, agent }
    }

    pub async fn run(&self, transport: &mut dyn Transport) -> Result<RunStatus, TransportError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("bridge_run", %run_id);

        async {
            let result = AssertUnwindSafe(self.execute(&mut *transport))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(BridgeError::Internal(panic_message(panic.as_ref()))));

            let (envelope, status) = match result {
                Ok(outcome) => {
                    info!(
                        iterations = outcome.iterations,
                        hit_iteration_limit = outcome.hit_iteration_limit,
                        "run completed"
                    );
                    (self.reply(outcome), RunStatus::Completed)
                }
                Err(failure) => (ErrorClassifier::classify(&failure), RunStatus::Failed),
            };

            transport.send(&envelope).await?;
            Ok(status)
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, transport: &mut dyn Transport) -> BridgeResult<AgentOutcome> {
        let payload = transport.receive().await?;
        let request = Request::from_payload(&payload)?;
        info!(
            nodes = request.nodes.len(),
            edges = request.edges.len(),
            plugins = request.plugin.len(),
            "request received"
        );

        let engine = self.provider.engine_for(&request)?;
        let mut dispatcher = CommandDispatcher::new(transport);
        AgentLoop::new(engine.as_ref(), &self.agent)
            .run(&request, &mut dispatcher)
            .await
    }

    fn reply(&self, outcome: AgentOutcome) -> Envelope {
        match self.agent.reply_kind {
            ReplyKind::Response => Envelope::Response {
                message: outcome.message,
                logs: outcome.transcript,
            },
            ReplyKind::Exit => Envelope::Exit {
                message: outcome.message,
                logs: outcome.transcript,
            },
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "agent run panicked".to_string())
}
