//! Chat-completions reasoning engine
//!
//! Implements [`crate::domain::ports::ReasoningEngine`] over the OpenAI-compatible
//! `/v1/chat/completions` endpoint with function calling, retry and error
//! classification.

pub mod client;
pub mod errors;
pub mod provider;
pub mod retry;
pub mod types;

pub use client::{OpenAiClient, OpenAiClientConfig};
pub use errors::OpenAiApiError;
pub use provider::OpenAiEngineProvider;
pub use retry::RetryPolicy;
