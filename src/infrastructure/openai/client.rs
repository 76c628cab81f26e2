//! HTTP client for the chat-completions API with function calling.

use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::errors::OpenAiApiError;
use super::retry::RetryPolicy;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage, WireTool};
use crate::domain::errors::ReasoningError;
use crate::domain::models::ToolDefinition;
use crate::domain::ports::{ChatMessage, EngineReply, ReasoningEngine, ToolCall};

/// Configuration for the chat-completions client
#[derive(Clone)]
pub struct OpenAiClientConfig {
    /// Provider API key
    pub api_key: String,

    /// Base URL, without the `/v1` suffix
    pub base_url: String,

    pub model: String,

    /// Sampling temperature (0.0 for deterministic tool use)
    pub temperature: f32,

    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub retry_policy: RetryPolicy,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout_secs: 120,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for OpenAiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Reasoning engine backed by the chat-completions endpoint
///
/// Features:
/// - Connection reuse via a single `reqwest::Client`
/// - Exponential backoff retry for transient errors (429, 5xx, network, timeout)
/// - One tool call per step; extra calls in a reply are dropped with a warning
pub struct OpenAiClient {
    http_client: ReqwestClient,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    /// Create a client with the given configuration
    pub fn with_config(config: OpenAiClientConfig) -> Result<Self, OpenAiApiError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Model this client sends requests to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: tools.iter().map(WireTool::from).collect(),
            // The flag is only accepted alongside tools.
            parallel_tool_calls: (!tools.is_empty()).then_some(false),
        }
    }

    async fn send_request(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiApiError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(OpenAiApiError::from_status(status, body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn interpret(response: ChatCompletionResponse) -> Result<EngineReply, OpenAiApiError> {
        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiApiError::EmptyResponse("response contained no choices".to_string()))?;

        let message = choice.message;
        let reasoning = message.content.filter(|text| !text.trim().is_empty());
        let mut calls = message.tool_calls.into_iter();

        match calls.next() {
            Some(first) => {
                let dropped = calls.count();
                if dropped > 0 {
                    warn!(
                        kept = %first.function.name,
                        dropped,
                        "model returned several tool calls; executing only the first"
                    );
                }
                Ok(EngineReply::ToolCall {
                    reasoning,
                    call: ToolCall::from(first),
                })
            }
            None => match reasoning {
                Some(text) => Ok(EngineReply::Final(text)),
                None => Err(OpenAiApiError::EmptyResponse(format!(
                    "choice had neither content nor tool calls (finish_reason: {})",
                    choice.finish_reason.as_deref().unwrap_or("none")
                ))),
            },
        }
    }
}

#[async_trait]
impl ReasoningEngine for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.config.model, messages = messages.len(), tools = tools.len()))]
    async fn next_step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<EngineReply, ReasoningError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ReasoningError::Authentication(
                "no API key was provided".to_string(),
            ));
        }

        let request = self.build_request(messages, tools);
        let response = self
            .config
            .retry_policy
            .execute(|| self.send_request(&request))
            .await?;

        Ok(Self::interpret(response)?)
    }
}
