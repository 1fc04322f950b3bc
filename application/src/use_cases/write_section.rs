//! Write Section use case
//!
//! The best-of-N drafting pipeline: generate one candidate per model, then
//! let the judge elect the best one. Fails when nothing usable was
//! generated or when the judge never produced a valid vote.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::error::PipelineError;
use crate::use_cases::generate_candidates::{
    GenerateCandidatesInput, GenerateCandidatesUseCase, GenerationOutcome,
};
use crate::use_cases::select_candidate::{
    SelectCandidateInput, SelectCandidateUseCase, SelectionOutcome,
};
use thesis_domain::prompt::substitute;
use thesis_domain::{Candidate, DomainError, Model};
use tracing::info;

/// Input for the WriteSection use case
#[derive(Debug, Clone)]
pub struct WriteSectionInput {
    pub system_prompt: String,
    /// Writing template as authored, with its own `{slot}`s
    pub writing_template: String,
    /// Values for the writing template's slots
    pub slots: Vec<(String, String)>,
    /// Reference material for the judge
    pub essay_content: String,
    pub compare_template: String,
    pub models: Vec<Model>,
    pub judge: Model,
    pub rounds: usize,
}

impl WriteSectionInput {
    /// Writing prompt sent to every candidate model.
    pub fn writing_prompt(&self) -> String {
        substitute(
            &self.writing_template,
            self.slots.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }
}

/// Result of a drafting pipeline run
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub generation: GenerationOutcome,
    pub selection: SelectionOutcome,
    pub best: Candidate,
}

/// Use case composing generation and selection
pub struct WriteSectionUseCase<G: LlmGateway + 'static> {
    generate: GenerateCandidatesUseCase<G>,
    select: SelectCandidateUseCase<G>,
}

impl<G: LlmGateway + 'static> WriteSectionUseCase<G> {
    pub fn new(generate: GenerateCandidatesUseCase<G>, select: SelectCandidateUseCase<G>) -> Self {
        Self { generate, select }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: WriteSectionInput) -> Result<SectionOutcome, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: WriteSectionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SectionOutcome, PipelineError> {
        let generation = self
            .generate
            .execute_with_progress(
                GenerateCandidatesInput {
                    system_prompt: input.system_prompt.clone(),
                    writing_prompt: input.writing_prompt(),
                    models: input.models.clone(),
                },
                progress,
            )
            .await?;

        if generation.candidates.is_empty() {
            return Err(DomainError::NoCandidates.into());
        }
        info!(
            "{} candidates generated, {} excluded",
            generation.candidates.len(),
            generation.excluded.len()
        );

        let selection = self
            .select
            .execute_with_progress(
                SelectCandidateInput::new(generation.candidates.clone())
                    .with_prompts(
                        input.system_prompt,
                        input.writing_template,
                        input.essay_content,
                    )
                    .with_compare_template(input.compare_template)
                    .with_rounds(input.rounds)
                    .with_judge(input.judge),
                progress,
            )
            .await?;

        let best = selection
            .winner
            .clone()
            .ok_or(PipelineError::NoSelection {
                rounds: selection.tally.rounds(),
            })?;
        info!("Best candidate: {} from {}", best.sequence_index, best.source_id);

        Ok(SectionOutcome {
            generation,
            selection,
            best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::run_archive::{InMemoryRunArchive, RunArchive};
    use crate::use_cases::shared::testing::{Reply, ScriptedGateway};
    use std::sync::Arc;
    use std::time::Duration;
    use thesis_domain::PromptTemplate;

    fn pipeline(gateway: Arc<ScriptedGateway>) -> WriteSectionUseCase<ScriptedGateway> {
        let archive: Arc<dyn RunArchive> = Arc::new(InMemoryRunArchive::new());
        WriteSectionUseCase::new(
            GenerateCandidatesUseCase::new(gateway.clone(), archive.clone())
                .with_throttle(Duration::ZERO),
            SelectCandidateUseCase::new(gateway, archive),
        )
    }

    fn input(models: Vec<Model>) -> WriteSectionInput {
        WriteSectionInput {
            system_prompt: "sys".to_string(),
            writing_template: "Write {章节名} from {essay}".to_string(),
            slots: vec![
                ("章节名".to_string(), "Chapter 3".to_string()),
                ("essay".to_string(), "the paper".to_string()),
            ],
            essay_content: "the paper".to_string(),
            compare_template: PromptTemplate::compare().to_string(),
            models,
            judge: Model::DeepSeekR1,
            rounds: 3,
        }
    }

    #[tokio::test]
    async fn test_generates_then_elects() {
        let gateway = Arc::new(
            ScriptedGateway::default()
                .with_model(Model::Gpt41, vec![Reply::text("draft A")])
                .with_model(Model::DeepSeekV3, vec![Reply::text("draft B")])
                .with_model(
                    Model::DeepSeekR1,
                    vec![Reply::text("2"), Reply::text("<think>1</think>2"), Reply::text("1")],
                ),
        );

        let outcome = pipeline(gateway.clone())
            .execute(input(vec![Model::Gpt41, Model::DeepSeekV3]))
            .await
            .unwrap();

        assert_eq!(outcome.best.content, "draft B");
        assert_eq!(outcome.best.source_id, "dsv3");
        assert_eq!(gateway.prompt(0), "Write Chapter 3 from the paper");
        // The judge sees the template as authored
        assert!(gateway.prompt(2).contains("Write {章节名} from {essay}"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_an_error() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::fail(), Reply::text("   ")]));
        let err = pipeline(gateway)
            .execute(input(vec![Model::Gpt41, Model::DeepSeekV3]))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Domain(DomainError::NoCandidates)));
    }

    #[tokio::test]
    async fn test_no_valid_votes_is_an_error() {
        let gateway = Arc::new(
            ScriptedGateway::default()
                .with_model(Model::Gpt41, vec![Reply::text("draft A")])
                .with_model(
                    Model::DeepSeekR1,
                    vec![Reply::text("none"), Reply::text("9"), Reply::fail()],
                ),
        );
        let err = pipeline(gateway)
            .execute(input(vec![Model::Gpt41]))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoSelection { rounds: 3 }));
    }
}
