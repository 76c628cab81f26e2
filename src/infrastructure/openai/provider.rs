use tracing::debug;

use super::client::{OpenAiClient, OpenAiClientConfig};
use super::retry::RetryPolicy;
use crate::domain::errors::ReasoningError;
use crate::domain::models::{AgentConfig, ProviderConfig, Request, RetryConfig};
use crate::domain::ports::{EngineProvider, ReasoningEngine};

/// Builds an [`OpenAiClient`] per request.
///
/// The key always comes from the request. Model and temperature come from the
/// request when present, otherwise from the agent defaults.
#[derive(Debug, Clone)]
pub struct OpenAiEngineProvider {
    agent: AgentConfig,
    provider: ProviderConfig,
    retry: RetryConfig,
}

impl OpenAiEngineProvider {
    pub fn new(agent: AgentConfig, provider: ProviderConfig, retry: RetryConfig) -> Self {
        Self {
            agent,
            provider,
            retry,
        }
    }

    fn client_config(&self, request: &Request) -> OpenAiClientConfig {
        OpenAiClientConfig {
            api_key: request.config.key.clone(),
            base_url: self.provider.base_url.clone(),
            model: request
                .config
                .model
                .clone()
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| self.agent.default_model.clone()),
            temperature: request
                .config
                .temperature
                .unwrap_or(self.agent.default_temperature),
            max_tokens: self.agent.max_tokens,
            timeout_secs: self.provider.timeout_secs,
            retry_policy: RetryPolicy::from(&self.retry),
        }
    }
}

impl EngineProvider for OpenAiEngineProvider {
    fn engine_for(&self, request: &Request) -> Result<Box<dyn ReasoningEngine>, ReasoningError> {
        let config = self.client_config(request);
        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(ReasoningError::Configuration(format!(
                "temperature {} is out of range 0.0..=2.0",
                config.temperature
            )));
        }
        debug!(model = %config.model, temperature = config.temperature, "building reasoning engine");

        let client = OpenAiClient::with_config(config)
            .map_err(|e| ReasoningError::Configuration(e.to_string()))?;
        Ok(Box::new(client))
    }
}
