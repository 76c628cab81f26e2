use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::ReasoningError;

/// Errors that can occur when interacting with the chat-completions API
#[derive(Error, Debug)]
pub enum OpenAiApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed: {0}")]
    InvalidApiKey(String),

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Model or endpoint not found (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response carried no usable choice
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Unknown or unexpected status
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl OpenAiApiError {
    /// Classify a non-success HTTP status and its body
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(body),
            StatusCode::UNAUTHORIZED => Self::InvalidApiKey(body),
            StatusCode::FORBIDDEN => Self::Forbidden(body),
            StatusCode::NOT_FOUND => Self::NotFound(body),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded(body),
            status if status.is_server_error() => Self::ServerError(status, body),
            _ => Self::UnknownError(status, body),
        }
    }

    /// Returns true if this error is transient and should be retried
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded(_) | Self::ServerError(_, _) | Self::Timeout | Self::NetworkError(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::InvalidApiKey(_) | Self::Forbidden(_) | Self::NotFound(_)
        )
    }
}

impl From<reqwest::Error> for OpenAiApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }
}

impl From<OpenAiApiError> for ReasoningError {
    fn from(err: OpenAiApiError) -> Self {
        match err {
            OpenAiApiError::InvalidApiKey(body) => Self::Authentication(body),
            OpenAiApiError::RateLimitExceeded(body) => Self::RateLimited(body),
            OpenAiApiError::NetworkError(e) => Self::Network(e.to_string()),
            OpenAiApiError::Timeout => Self::Network("request timed out".to_string()),
            OpenAiApiError::JsonError(e) => Self::InvalidResponse(e.to_string()),
            OpenAiApiError::EmptyResponse(reason) => Self::InvalidResponse(reason),
            other => Self::Provider(other.to_string()),
        }
    }
}
