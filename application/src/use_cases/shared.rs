//! Shared helpers for the pipeline use cases.
//!
//! One gateway exchange with transcript logging, and best-effort archive
//! writes for stages whose artifacts must not abort the run.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::run_archive::{RunArchive, RunHandle};
use thesis_domain::{Message, Model, Phase};
use tracing::{debug, warn};

/// Where in the pipeline an exchange happens, for the transcript.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Exchange {
    pub phase: Phase,
    pub round: usize,
    pub attempt: u32,
}

impl Exchange {
    pub fn new(phase: Phase, round: usize) -> Self {
        Self {
            phase,
            round,
            attempt: 1,
        }
    }

    pub fn attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }
}

/// Send `messages` to `model` once and record the exchange.
pub(crate) async fn exchange<G: LlmGateway + ?Sized>(
    gateway: &G,
    logger: &dyn ConversationLogger,
    model: &Model,
    messages: &[Message],
    at: Exchange,
) -> Result<String, GatewayError> {
    let prompt_chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
    debug!(
        model = %model,
        phase = at.phase.as_str(),
        round = at.round,
        attempt = at.attempt,
        prompt_chars,
        "Sending request"
    );

    let result = gateway.complete(messages, model).await;

    let outcome = match &result {
        Ok(text) => serde_json::json!({ "bytes": text.len(), "text": text }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };
    logger.log(ConversationEvent::new(
        "llm_exchange",
        serde_json::json!({
            "model": model.as_str(),
            "phase": at.phase.as_str(),
            "round": at.round,
            "attempt": at.attempt,
            "prompt_chars": prompt_chars,
            "outcome": outcome,
        }),
    ));

    result
}

/// Write an artifact, logging instead of failing.
pub(crate) fn archive_best_effort(
    archive: &dyn RunArchive,
    run: &RunHandle,
    artifact: &str,
    content: &str,
) {
    if let Err(e) = archive.write(run, artifact, content) {
        warn!(run = %run, artifact, "Failed to archive artifact: {}", e);
    }
}
