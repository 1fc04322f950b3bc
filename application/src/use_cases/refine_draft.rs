//! Refine Draft use case
//!
//! Runs the bounded critique→revise loop over a draft. Every stage of every
//! round is archived under a sequenced run namespace before the loop moves
//! on, so an interrupted run can be audited from its artifacts.
//!
//! ```text
//! round r:  draft ──► critique ──► review? ──► revise ──► revision?
//!             ▲                                              │
//!             └──────── replaced when revision is non-blank ─┘
//! ```
//!
//! A stage that keeps failing after its retry budget yields nothing; the
//! round still counts and the draft carries over unchanged.

use crate::config::RetryPolicy;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_archive::{ArchiveError, RunArchive, RunHandle};
use crate::use_cases::error::PipelineError;
use crate::use_cases::shared::{Exchange, archive_best_effort, exchange};
use serde_json::Value;
use std::sync::Arc;
use thesis_domain::archive::{ArtifactKind, FINAL_DRAFT_ARTIFACT, RefineStage, stage_artifact};
use thesis_domain::prompt::{slots, substitute};
use thesis_domain::{
    ExtractionError, Message, Model, Phase, PromptTemplate, ReasoningFilter, RefinedDraft,
    RefinementState, RunNaming, RunScope, extract_json,
};
use thiserror::Error;
use tracing::{info, warn};

const PARSE_ERROR_KEY: &str = "__parse_error__";

/// Input for the RefineDraft use case
#[derive(Debug, Clone)]
pub struct RefineDraftInput {
    /// Draft entering round 1
    pub draft: String,
    /// Source paper text (may be empty)
    pub essay: String,
    /// Style exemplar from an accepted thesis
    pub exemplar: String,
    /// Writing instruction the draft was produced for
    pub directive: String,
    /// Higher-level overview of the chapter
    pub overview: String,
    pub system_prompt: String,
    pub critique_template: String,
    pub revise_template: String,
    pub rounds: usize,
    pub model: Model,
    /// How the run namespace is named
    pub naming: RunNaming,
}

impl RefineDraftInput {
    pub fn new(draft: impl Into<String>) -> Self {
        Self {
            draft: draft.into(),
            essay: String::new(),
            exemplar: String::new(),
            directive: String::new(),
            overview: String::new(),
            system_prompt: PromptTemplate::system().to_string(),
            critique_template: PromptTemplate::critique().to_string(),
            revise_template: PromptTemplate::revise().to_string(),
            rounds: 10,
            model: Model::default(),
            naming: RunNaming::Random,
        }
    }

    pub fn with_context(
        mut self,
        essay: impl Into<String>,
        exemplar: impl Into<String>,
        directive: impl Into<String>,
        overview: impl Into<String>,
    ) -> Self {
        self.essay = essay.into();
        self.exemplar = exemplar.into();
        self.directive = directive.into();
        self.overview = overview.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_templates(
        mut self,
        critique_template: impl Into<String>,
        revise_template: impl Into<String>,
    ) -> Self {
        self.critique_template = critique_template.into();
        self.revise_template = revise_template.into();
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_naming(mut self, naming: RunNaming) -> Self {
        self.naming = naming;
        self
    }

    fn critique_prompt(&self, draft: &str) -> String {
        substitute(
            &self.critique_template,
            [
                (slots::DRAFT, draft),
                (slots::ESSAY, self.essay.as_str()),
                (slots::EXEMPLAR, self.exemplar.as_str()),
                (slots::DIRECTIVE, self.directive.as_str()),
            ],
        )
    }

    fn revise_prompt(&self, draft: &str, critique: &str) -> String {
        substitute(
            &self.revise_template,
            [
                (slots::DRAFT, draft),
                (slots::CRITIQUE, critique),
                (slots::OVERVIEW, self.overview.as_str()),
                (slots::ESSAY, self.essay.as_str()),
            ],
        )
    }
}

/// Result of a refinement run
#[derive(Debug, Clone)]
pub struct RefinementOutcome {
    pub run: RunHandle,
    pub result: RefinedDraft,
}

/// Why a single stage attempt failed
#[derive(Error, Debug)]
enum StageError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Use case for iteratively refining a draft
pub struct RefineDraftUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    archive: Arc<dyn RunArchive>,
    conversation_logger: Arc<dyn ConversationLogger>,
    reasoning: ReasoningFilter,
    retry: RetryPolicy,
}

impl<G: LlmGateway + 'static> RefineDraftUseCase<G> {
    pub fn new(gateway: Arc<G>, archive: Arc<dyn RunArchive>) -> Self {
        Self {
            gateway,
            archive,
            conversation_logger: Arc::new(NoConversationLogger),
            reasoning: ReasoningFilter::default(),
            retry: RetryPolicy::default(),
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

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RefineDraftInput,
    ) -> Result<RefinementOutcome, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RefineDraftInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RefinementOutcome, PipelineError> {
        let mut state = RefinementState::new(input.draft.clone(), input.rounds)?;
        let run = self.archive.open_run(RunScope::Refinement, &input.naming)?;
        info!(
            run = %run,
            "Refining draft over {} rounds with {}",
            input.rounds, input.model
        );

        while let Some(round) = state.current_round() {
            progress.on_round_start(round, state.rounds());

            progress.on_phase_start(&Phase::Critique, 1);
            let critique = self.critique(&run, &input, state.draft(), round).await?;
            progress.on_task_complete(&Phase::Critique, &input.model, critique.is_some());
            progress.on_phase_complete(&Phase::Critique);

            progress.on_phase_start(&Phase::Revision, 1);
            let revision = self
                .revise(
                    &run,
                    &input,
                    state.draft(),
                    critique.as_deref().unwrap_or_default(),
                    round,
                )
                .await?;
            progress.on_task_complete(&Phase::Revision, &input.model, revision.is_some());
            progress.on_phase_complete(&Phase::Revision);

            state.complete_round(critique, revision);
            if let Some(done) = state.history().last() {
                info!(
                    "Round {}/{}: critique {}, revision {}",
                    round,
                    state.rounds(),
                    if done.critique.is_some() { "received" } else { "missing" },
                    if done.applied { "applied" } else { "skipped" }
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "refine_round",
                    serde_json::json!({
                        "round": round,
                        "critique": done.critique.is_some(),
                        "applied": done.applied,
                    }),
                ));
            }
        }

        let result = state.finish();
        self.archive
            .write(&run, FINAL_DRAFT_ARTIFACT, &result.final_draft)?;
        info!(
            "Refinement finished: {}/{} revisions applied",
            result.revisions_applied(),
            result.rounds_run()
        );

        Ok(RefinementOutcome { run, result })
    }

    /// Critique stage: the review text, or `None` once the budget is spent
    /// or the answer carries no `review` field.
    async fn critique(
        &self,
        run: &RunHandle,
        input: &RefineDraftInput,
        draft: &str,
        round: usize,
    ) -> Result<Option<String>, PipelineError> {
        let messages = Message::framed(&input.system_prompt, input.critique_prompt(draft));
        let mut last_error = None;

        for attempt in 1..=self.retry.attempts {
            let at = Exchange::new(Phase::Critique, round).attempt(attempt);
            match self.try_critique(run, &messages, &input.model, at).await {
                Ok(review) => return Ok(review),
                Err(StageError::Gateway(e)) if e.is_configuration() => return Err(e.into()),
                Err(e) => {
                    warn!(round, attempt, "Critique attempt failed: {}", e);
                    last_error = Some(e);
                    self.pause_before(attempt).await;
                }
            }
        }

        self.record_give_up(run, RefineStage::Critique, round, last_error);
        Ok(None)
    }

    async fn try_critique(
        &self,
        run: &RunHandle,
        messages: &[Message],
        model: &Model,
        at: Exchange,
    ) -> Result<Option<String>, StageError> {
        let stage = RefineStage::Critique;
        let round = at.round;

        let raw = self.ask(messages, model, at).await?;
        self.archive.write(
            run,
            &stage_artifact(stage, round, ArtifactKind::Raw { attempt: at.attempt }),
            &raw,
        )?;

        let text = self.reasoning.apply(model, &raw);
        let parsed = self.parse(run, stage, at, &text)?;

        let review = parsed.get("review").and_then(value_text);
        match &review {
            Some(review) => self.archive.write(
                run,
                &stage_artifact(stage, round, ArtifactKind::Text),
                review,
            )?,
            None => warn!(round, "Critique has no review field"),
        }
        Ok(review)
    }

    /// Revise stage: the revised draft, or `None` once the budget is spent
    /// without any readable answer.
    async fn revise(
        &self,
        run: &RunHandle,
        input: &RefineDraftInput,
        draft: &str,
        critique: &str,
        round: usize,
    ) -> Result<Option<String>, PipelineError> {
        let messages = Message::framed(&input.system_prompt, input.revise_prompt(draft, critique));
        let mut last_error = None;
        let mut unparsed_fallback = None;

        for attempt in 1..=self.retry.attempts {
            let at = Exchange::new(Phase::Revision, round).attempt(attempt);
            match self
                .try_revise(run, &messages, &input.model, at, &mut unparsed_fallback)
                .await
            {
                Ok(revision) => return Ok(revision),
                Err(StageError::Gateway(e)) if e.is_configuration() => return Err(e.into()),
                Err(e) => {
                    warn!(round, attempt, "Revision attempt failed: {}", e);
                    last_error = Some(e);
                    self.pause_before(attempt).await;
                }
            }
        }

        self.record_give_up(run, RefineStage::Revision, round, last_error);

        if let Some(text) = unparsed_fallback {
            info!(round, "Accepting unstructured revision text");
            archive_best_effort(
                self.archive.as_ref(),
                run,
                &stage_artifact(RefineStage::Revision, round, ArtifactKind::Text),
                &text,
            );
            return Ok(Some(text));
        }
        Ok(None)
    }

    async fn try_revise(
        &self,
        run: &RunHandle,
        messages: &[Message],
        model: &Model,
        at: Exchange,
        unparsed_fallback: &mut Option<String>,
    ) -> Result<Option<String>, StageError> {
        let stage = RefineStage::Revision;
        let round = at.round;

        let raw = self.ask(messages, model, at).await?;
        self.archive.write(
            run,
            &stage_artifact(stage, round, ArtifactKind::Raw { attempt: at.attempt }),
            &raw,
        )?;

        let cleaned = self.reasoning.markers().strip(&raw);
        let parsed = match self.parse(run, stage, at, &cleaned) {
            Ok(parsed) => parsed,
            Err(e) => {
                if !cleaned.is_empty() {
                    *unparsed_fallback = Some(cleaned);
                }
                return Err(e);
            }
        };

        let revision = match parsed.get("revised_text") {
            Some(value) => value_text(value),
            None => Some(cleaned),
        };
        if let Some(revision) = &revision {
            self.archive.write(
                run,
                &stage_artifact(stage, round, ArtifactKind::Text),
                revision,
            )?;
        }
        Ok(revision)
    }

    async fn ask(
        &self,
        messages: &[Message],
        model: &Model,
        at: Exchange,
    ) -> Result<String, GatewayError> {
        exchange(
            self.gateway.as_ref(),
            self.conversation_logger.as_ref(),
            model,
            messages,
            at,
        )
        .await
    }

    /// Recover JSON from `text`, archiving the parsed value or a failure dump.
    fn parse(
        &self,
        run: &RunHandle,
        stage: RefineStage,
        at: Exchange,
        text: &str,
    ) -> Result<Value, StageError> {
        let round = at.round;
        match extract_json(text) {
            Ok(parsed) => {
                self.archive.write(
                    run,
                    &stage_artifact(stage, round, ArtifactKind::Parsed),
                    &pretty(&parsed),
                )?;
                Ok(parsed)
            }
            Err(e) => {
                archive_best_effort(
                    self.archive.as_ref(),
                    run,
                    &stage_artifact(
                        stage,
                        round,
                        ArtifactKind::FailureDump {
                            attempt: at.attempt,
                        },
                    ),
                    text,
                );
                Err(e.into())
            }
        }
    }

    /// Mark the stage's parsed artifact with the last error.
    fn record_give_up(
        &self,
        run: &RunHandle,
        stage: RefineStage,
        round: usize,
        last_error: Option<StageError>,
    ) {
        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        warn!(round, "{} stage gave up: {}", stage, message);

        let marker = serde_json::json!({ PARSE_ERROR_KEY: message });
        archive_best_effort(
            self.archive.as_ref(),
            run,
            &stage_artifact(stage, round, ArtifactKind::Parsed),
            &pretty(&marker),
        );
    }

    async fn pause_before(&self, attempt: u32) {
        if self.retry.has_next(attempt) && !self.retry.delay.is_zero() {
            tokio::time::sleep(self.retry.delay).await;
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
