//! Generate Candidates use case
//!
//! Every candidate model drafts the same section, one model at a time with
//! a pause between calls. Each answer is archived twice for reasoning
//! models: once as returned, once with the reasoning removed.

use crate::config::PipelineParams;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_archive::{RunArchive, RunHandle};
use crate::use_cases::error::PipelineError;
use crate::use_cases::shared::{Exchange, archive_best_effort, exchange};
use std::sync::Arc;
use std::time::Duration;
use thesis_domain::archive::{candidate_artifact, candidate_reasoning_artifact};
use thesis_domain::{
    CandidateSet, DomainError, Message, Model, Phase, ReasoningFilter, RunNaming, RunScope,
};
use tracing::{info, warn};

/// Input for the GenerateCandidates use case
#[derive(Debug, Clone)]
pub struct GenerateCandidatesInput {
    pub system_prompt: String,
    /// Writing prompt with every slot already filled
    pub writing_prompt: String,
    /// Models to query, in order
    pub models: Vec<Model>,
}

/// A model that produced no usable candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedModel {
    pub model: Model,
    pub reason: String,
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub run: RunHandle,
    /// Usable candidates, numbered in query order
    pub candidates: CandidateSet,
    pub excluded: Vec<ExcludedModel>,
}

/// Use case for drafting one section with several models
pub struct GenerateCandidatesUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    archive: Arc<dyn RunArchive>,
    conversation_logger: Arc<dyn ConversationLogger>,
    reasoning: ReasoningFilter,
    throttle: Duration,
}

impl<G: LlmGateway + 'static> GenerateCandidatesUseCase<G> {
    pub fn new(gateway: Arc<G>, archive: Arc<dyn RunArchive>) -> Self {
        Self {
            gateway,
            archive,
            conversation_logger: Arc::new(NoConversationLogger),
            reasoning: ReasoningFilter::default(),
            throttle: PipelineParams::default().throttle,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_reasoning_filter(mut self, reasoning: ReasoningFilter) -> Self {
        self.reasoning = reasoning;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: GenerateCandidatesInput,
    ) -> Result<GenerationOutcome, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: GenerateCandidatesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<GenerationOutcome, PipelineError> {
        if input.models.is_empty() {
            return Err(DomainError::NoCandidates.into());
        }

        let run = self.archive.open_run(RunScope::Generation, &RunNaming::Random)?;
        info!(run = %run, "Generating candidates with {} models", input.models.len());
        progress.on_phase_start(&Phase::Generation, input.models.len());

        let messages = Message::framed(&input.system_prompt, &input.writing_prompt);
        let mut usable = Vec::new();
        let mut excluded = Vec::new();

        for (i, model) in input.models.iter().enumerate() {
            if i > 0 && !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }

            let result = exchange(
                self.gateway.as_ref(),
                self.conversation_logger.as_ref(),
                model,
                &messages,
                Exchange::new(Phase::Generation, i + 1),
            )
            .await;

            let raw = match result {
                Ok(raw) => raw,
                Err(e) if e.is_configuration() => return Err(e.into()),
                Err(e) => {
                    warn!("Model {} failed: {}", model, e);
                    archive_best_effort(
                        self.archive.as_ref(),
                        &run,
                        &candidate_artifact(model.as_str()),
                        "",
                    );
                    progress.on_task_complete(&Phase::Generation, model, false);
                    excluded.push(ExcludedModel {
                        model: *model,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if self.reasoning.applies_to(model) {
                archive_best_effort(
                    self.archive.as_ref(),
                    &run,
                    &candidate_reasoning_artifact(model.as_str()),
                    &raw,
                );
            }
            let content = self.reasoning.apply(model, &raw);
            archive_best_effort(
                self.archive.as_ref(),
                &run,
                &candidate_artifact(model.as_str()),
                &content,
            );

            if content.trim().is_empty() {
                warn!("Model {} returned an empty candidate, excluding it", model);
                progress.on_task_complete(&Phase::Generation, model, false);
                excluded.push(ExcludedModel {
                    model: *model,
                    reason: "empty response".to_string(),
                });
                continue;
            }

            info!("Model {} produced a candidate ({} chars)", model, content.chars().count());
            progress.on_task_complete(&Phase::Generation, model, true);
            usable.push((model.as_str(), content));
        }

        progress.on_phase_complete(&Phase::Generation);

        Ok(GenerationOutcome {
            run,
            candidates: CandidateSet::numbered(usable),
            excluded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::ports::run_archive::InMemoryRunArchive;
    use crate::use_cases::shared::testing::{RecordingLogger, Reply, ScriptedGateway};

    fn input(models: Vec<Model>) -> GenerateCandidatesInput {
        GenerateCandidatesInput {
            system_prompt: "You are a thesis advisor.".to_string(),
            writing_prompt: "Write the method section.".to_string(),
            models,
        }
    }

    #[tokio::test]
    async fn test_failed_and_empty_candidates_are_excluded() {
        let gateway = Arc::new(
            ScriptedGateway::default()
                .with_model(Model::Gemini20Flash, vec![Reply::text("Flash draft")])
                .with_model(Model::DeepSeekR1, vec![Reply::text("<think>plan</think>\n\n")])
                .with_model(Model::Gpt41, vec![Reply::fail()])
                .with_model(Model::Qwen3, vec![Reply::text("<think>a</think>Qwen draft")]),
        );
        let archive = Arc::new(InMemoryRunArchive::new());
        let use_case = GenerateCandidatesUseCase::new(gateway.clone(), archive.clone())
            .with_throttle(Duration::ZERO);

        let outcome = use_case
            .execute(input(vec![
                Model::Gemini20Flash,
                Model::DeepSeekR1,
                Model::Gpt41,
                Model::Qwen3,
            ]))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        let first = outcome.candidates.get(1).unwrap();
        assert_eq!(first.source_id, "gemini-2.0-flash");
        let second = outcome.candidates.get(2).unwrap();
        assert_eq!(second.source_id, "qwen3");
        assert_eq!(second.content, "Qwen draft");

        let excluded: Vec<_> = outcome.excluded.iter().map(|e| e.model).collect();
        assert_eq!(excluded, vec![Model::DeepSeekR1, Model::Gpt41]);
        assert_eq!(gateway.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_reasoning_models_archive_both_versions() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::text("<think>outline first</think>Final text"),
            Reply::text("Plain <think>kept</think> text"),
        ]));
        let archive = Arc::new(InMemoryRunArchive::new());
        let use_case = GenerateCandidatesUseCase::new(gateway, archive.clone())
            .with_throttle(Duration::ZERO);

        let outcome = use_case
            .execute(input(vec![Model::DeepSeekR1, Model::DeepSeekV3]))
            .await
            .unwrap();

        let run = &outcome.run;
        assert_eq!(
            archive.read(run, "candidate_dsr1_with_reasoning.txt").unwrap(),
            "<think>outline first</think>Final text"
        );
        assert_eq!(archive.read(run, "candidate_dsr1.txt").unwrap(), "Final text");
        // Non-reasoning models pass through untouched
        assert_eq!(
            archive.read(run, "candidate_dsv3.txt").unwrap(),
            "Plain <think>kept</think> text"
        );
        assert!(archive.read(run, "candidate_dsv3_with_reasoning.txt").is_err());
    }

    #[tokio::test]
    async fn test_configuration_error_is_fatal() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Fail(
            GatewayError::ModelNotConfigured("doubao".into()),
        )]));
        let use_case =
            GenerateCandidatesUseCase::new(gateway.clone(), Arc::new(InMemoryRunArchive::new()))
                .with_throttle(Duration::ZERO);

        let err = use_case
            .execute(input(vec![Model::Doubao, Model::Gpt41]))
            .await
            .unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_no_models_is_rejected() {
        let use_case = GenerateCandidatesUseCase::new(
            Arc::new(ScriptedGateway::default()),
            Arc::new(InMemoryRunArchive::new()),
        );
        let err = use_case.execute(input(vec![])).await.unwrap_err();
        assert!(matches!(err, PipelineError::Domain(DomainError::NoCandidates)));
    }

    #[tokio::test]
    async fn test_every_exchange_is_logged() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::text("a"),
            Reply::fail(),
        ]));
        let logger = Arc::new(RecordingLogger::default());
        let use_case = GenerateCandidatesUseCase::new(gateway, Arc::new(InMemoryRunArchive::new()))
            .with_conversation_logger(logger.clone())
            .with_throttle(Duration::ZERO);

        use_case
            .execute(input(vec![Model::Gpt41, Model::DeepSeekV3]))
            .await
            .unwrap();

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "llm_exchange");
        assert_eq!(events[0].1["model"], "gpt-4.1");
        assert!(events[1].1["outcome"]["error"].is_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_between_calls() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::text("a"),
            Reply::text("b"),
            Reply::text("c"),
        ]));
        let use_case = GenerateCandidatesUseCase::new(gateway, Arc::new(InMemoryRunArchive::new()))
            .with_throttle(Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        use_case
            .execute(input(vec![Model::Gpt41, Model::DeepSeekV3, Model::Doubao]))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
