//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use thesis_domain::{Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The model has no route, its backend is missing, or its credentials
    /// are absent. Never retried.
    #[error("Model not configured: {0}")]
    ModelNotConfigured(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Configuration problems are fatal; everything else is a backend
    /// failure the caller may retry or degrade on.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::ModelNotConfigured(_))
    }
}

/// Gateway for LLM communication
///
/// One call is one round-trip: the ordered messages go out, the text of the
/// first choice comes back. The gateway never retries.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn complete(&self, messages: &[Message], model: &Model) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_distinguished() {
        assert!(GatewayError::ModelNotConfigured("qwen3".into()).is_configuration());
        assert!(!GatewayError::Timeout.is_configuration());
        assert!(!GatewayError::RequestFailed("429".into()).is_configuration());
    }
}
