//! LLM providers
//!
//! Every backend speaks the OpenAI chat-completions protocol. The
//! [`RoutingGateway`] maps a [`Model`](thesis_domain::Model) to the backend
//! that serves it and the name that backend knows it by.

pub mod openai_compat;
pub mod routing;

pub use openai_compat::OpenAiCompatBackend;
pub use routing::{ModelRoute, RoutingGateway};

use async_trait::async_trait;
use thesis_application::ports::llm_gateway::GatewayError;
use thesis_domain::Message;

/// One chat-completions endpoint
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Name used in `[backends]` and `[routes]`.
    fn name(&self) -> &str;

    /// Send `messages` to `remote_model` and return the reply text.
    async fn chat(&self, remote_model: &str, messages: &[Message]) -> Result<String, GatewayError>;
}
