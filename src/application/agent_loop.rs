//! Bounded reasoning loop driving the engine and the host.
//!
//! Each iteration asks the engine for one step. A tool call is decoded into a
//! [`GraphCommand`], dispatched, and the host's raw answer is folded back into the
//! conversation before the next step. Calls the model gets wrong (unknown tool,
//! bad arguments) never reach the host; the rejection text is the observation.

use tracing::{debug, info, warn};

use super::dispatcher::CommandDispatcher;
use super::prompt::PromptTemplate;
use crate::domain::errors::BridgeResult;
use crate::domain::models::{AgentConfig, EarlyStopping, GraphCommand, Request};
use crate::domain::ports::{ChatMessage, EngineReply, ReasoningEngine};

/// Final answer used when the loop is cut off by the iteration cap.
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

const FINAL_ANSWER_REQUEST: &str = "You have reached the maximum number of steps. \
Do not call any more functions. Reply now with your one sentence summary of what was done.";

/// Result of a completed loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutcome {
    /// Natural-language answer for the user
    pub message: String,
    /// Reasoning text, tool invocations and observations, in order
    pub transcript: Vec<String>,
    /// Engine steps taken, not counting a final summary request
    pub iterations: u32,
    /// True when the iteration cap ended the run
    pub hit_iteration_limit: bool,
}

pub struct AgentLoop<'e> {
    engine: &'e dyn ReasoningEngine,
    max_iterations: u32,
    early_stopping: EarlyStopping,
}

impl<'e> AgentLoop<'e> {
    pub fn new(engine: &'e dyn ReasoningEngine, config: &AgentConfig) -> Self {
        Self {
            engine,
            max_iterations: config.max_iterations,
            early_stopping: config.early_stopping,
        }
    }

    /// Run the loop for `request`, issuing host commands through `dispatcher`.
    ///
    /// Transport and reasoning failures abort the run. Tool-level failures do not.
    pub async fn run(
        &self,
        request: &Request,
        dispatcher: &mut CommandDispatcher<'_>,
    ) -> BridgeResult<AgentOutcome> {
        let tools = GraphCommand::catalog();
        let mut messages = PromptTemplate::render(request);
        let mut transcript = Vec::new();

        for iteration in 1..=self.max_iterations {
            debug!(iteration, "requesting next step");
            let (reasoning, call) = match self.engine.next_step(&messages, &tools).await? {
                EngineReply::Final(message) => {
                    info!(iteration, "engine produced a final answer");
                    return Ok(AgentOutcome {
                        message,
                        transcript,
                        iterations: iteration,
                        hit_iteration_limit: false,
                    });
                }
                EngineReply::ToolCall { reasoning, call } => (reasoning, call),
            };

            if let Some(text) = &reasoning {
                transcript.push(text.clone());
            }
            transcript.push(format!("Invoking `{}` with `{}`", call.name, call.arguments));

            let observation = match GraphCommand::from_call(&call.name, &call.arguments) {
                Ok(command) => dispatcher.dispatch(&command).await?,
                Err(rejection) => {
                    warn!(tool = %call.name, %rejection, "rejected tool call");
                    rejection.to_string()
                }
            };
            transcript.push(observation.clone());

            let call_id = call.id.clone();
            messages.push(ChatMessage::Assistant {
                content: reasoning,
                tool_call: Some(call),
            });
            messages.push(ChatMessage::Tool {
                call_id,
                content: observation,
            });
        }

        warn!(
            max_iterations = self.max_iterations,
            strategy = ?self.early_stopping,
            "iteration limit reached"
        );
        transcript.push(format!(
            "Stopped after reaching the limit of {} iterations.",
            self.max_iterations
        ));

        let message = match self.early_stopping {
            EarlyStopping::Force => ITERATION_LIMIT_MESSAGE.to_string(),
            EarlyStopping::Generate => self.final_answer(messages).await,
        };

        Ok(AgentOutcome {
            message,
            transcript,
            iterations: self.max_iterations,
            hit_iteration_limit: true,
        })
    }

    /// One last tool-less step asking the engine to summarize.
    async fn final_answer(&self, mut messages: Vec<ChatMessage>) -> String {
        messages.push(ChatMessage::User(FINAL_ANSWER_REQUEST.to_string()));

        match self.engine.next_step(&messages, &[]).await {
            Ok(EngineReply::Final(message)) => message,
            Ok(EngineReply::ToolCall { call, .. }) => {
                warn!(tool = %call.name, "engine still requested a tool after the limit");
                ITERATION_LIMIT_MESSAGE.to_string()
            }
            Err(err) => {
                warn!(error = %err, "summary request failed after the limit");
                ITERATION_LIMIT_MESSAGE.to_string()
            }
        }
    }
}
