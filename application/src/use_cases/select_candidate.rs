//! Select Candidate use case
//!
//! Best-of-N selection: the judge model receives one comparison prompt
//! embedding every candidate and answers it `rounds` times. Each answer is
//! archived before it is interpreted, then counted as at most one vote.

use crate::config::PipelineParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_archive::{RunArchive, RunHandle};
use crate::use_cases::error::PipelineError;
use crate::use_cases::shared::{Exchange, archive_best_effort, exchange};
use std::sync::Arc;
use thesis_domain::archive::{TALLY_ARTIFACT, WINNER_ARTIFACT, comparison_artifact};
use thesis_domain::prompt::{slots, substitute};
use thesis_domain::{
    Candidate, CandidateSet, DomainError, Election, Message, Model, Phase, PromptTemplate,
    ReasoningFilter, RunNaming, RunScope, SelectionRound, VoteChoice, VoteTally,
};
use tracing::{info, warn};

/// Input for the SelectCandidate use case
#[derive(Debug, Clone)]
pub struct SelectCandidateInput {
    pub system_prompt: String,
    /// Writing instruction the candidates were produced for
    pub writing_prompt: String,
    /// Reference material the judge compares against
    pub essay_content: String,
    /// Comparison template with `{sys_prompt}`, `{writing_prompt}`,
    /// `{essay_content}` and `{candidates}` slots
    pub compare_template: String,
    pub candidates: CandidateSet,
    pub rounds: usize,
    pub judge: Model,
}

impl SelectCandidateInput {
    pub fn new(candidates: CandidateSet) -> Self {
        Self {
            system_prompt: PromptTemplate::system().to_string(),
            writing_prompt: String::new(),
            essay_content: String::new(),
            compare_template: PromptTemplate::compare().to_string(),
            candidates,
            rounds: PipelineParams::default().comparison_rounds,
            judge: Model::default(),
        }
    }

    pub fn with_prompts(
        mut self,
        system_prompt: impl Into<String>,
        writing_prompt: impl Into<String>,
        essay_content: impl Into<String>,
    ) -> Self {
        self.system_prompt = system_prompt.into();
        self.writing_prompt = writing_prompt.into();
        self.essay_content = essay_content.into();
        self
    }

    pub fn with_compare_template(mut self, template: impl Into<String>) -> Self {
        self.compare_template = template.into();
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_judge(mut self, judge: Model) -> Self {
        self.judge = judge;
        self
    }

    /// The comparison prompt sent in every round.
    pub fn comparison_prompt(&self) -> String {
        let rendered = self.candidates.render_for_comparison();
        substitute(
            &self.compare_template,
            [
                (slots::SYSTEM_PROMPT, self.system_prompt.as_str()),
                (slots::WRITING_PROMPT, self.writing_prompt.as_str()),
                (slots::ESSAY_CONTENT, self.essay_content.as_str()),
                (slots::CANDIDATES, rendered.as_str()),
            ],
        )
    }
}

/// Result of a selection run
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub run: RunHandle,
    pub rounds: Vec<SelectionRound>,
    pub tally: VoteTally,
    pub election: Election,
    /// The elected candidate, absent when no valid vote was cast
    pub winner: Option<Candidate>,
}

/// Use case for electing the best of several candidates
pub struct SelectCandidateUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    archive: Arc<dyn RunArchive>,
    conversation_logger: Arc<dyn ConversationLogger>,
    reasoning: ReasoningFilter,
}

impl<G: LlmGateway + 'static> SelectCandidateUseCase<G> {
    pub fn new(gateway: Arc<G>, archive: Arc<dyn RunArchive>) -> Self {
        Self {
            gateway,
            archive,
            conversation_logger: Arc::new(NoConversationLogger),
            reasoning: ReasoningFilter::default(),
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

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: SelectCandidateInput,
    ) -> Result<SelectionOutcome, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: SelectCandidateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SelectionOutcome, PipelineError> {
        if input.candidates.is_empty() {
            return Err(DomainError::NoCandidates.into());
        }
        if input.rounds == 0 {
            return Err(DomainError::ZeroRounds.into());
        }

        let run = self.archive.open_run(RunScope::Comparison, &RunNaming::Random)?;
        let candidate_count = input.candidates.len();
        info!(
            run = %run,
            "Comparing {} candidates over {} rounds with {}",
            candidate_count, input.rounds, input.judge
        );
        progress.on_phase_start(&Phase::Selection, input.rounds);

        let messages = Message::framed(&input.system_prompt, input.comparison_prompt());
        let mut tally = VoteTally::new(candidate_count);
        let mut rounds = Vec::with_capacity(input.rounds);

        for round in 1..=input.rounds {
            let result = exchange(
                self.gateway.as_ref(),
                self.conversation_logger.as_ref(),
                &input.judge,
                &messages,
                Exchange::new(Phase::Selection, round),
            )
            .await;

            let selection_round = match result {
                Ok(raw) => {
                    archive_best_effort(
                        self.archive.as_ref(),
                        &run,
                        &comparison_artifact(round),
                        &raw,
                    );
                    let sanitized = self.reasoning.apply(&input.judge, &raw);
                    SelectionRound::judged(round, raw, sanitized, candidate_count)
                }
                Err(e) if e.is_configuration() => return Err(e.into()),
                Err(e) => {
                    archive_best_effort(
                        self.archive.as_ref(),
                        &run,
                        &comparison_artifact(round),
                        "",
                    );
                    SelectionRound::failed(round, e.to_string())
                }
            };

            let counted = tally.record(&selection_round.choice);
            match &selection_round.choice {
                VoteChoice::Valid { index } => info!("Round {}: vote for candidate {}", round, index),
                VoteChoice::OutOfRange { token } => {
                    warn!("Round {}: invalid candidate number {}", round, token)
                }
                VoteChoice::Missing => warn!(
                    "Round {}: no candidate number in answer: {}",
                    round,
                    thesis_domain::core::string::preview(&selection_round.sanitized_response, 80)
                ),
                VoteChoice::Failed { reason } => warn!("Round {}: judge failed: {}", round, reason),
            }
            self.conversation_logger.log(ConversationEvent::new(
                "vote_cast",
                serde_json::json!({
                    "judge": input.judge.as_str(),
                    "round": round,
                    "choice": selection_round.choice,
                }),
            ));
            progress.on_task_complete(&Phase::Selection, &input.judge, counted);
            rounds.push(selection_round);
        }

        let election = tally.elect();
        let winner = election
            .winner_index()
            .and_then(|index| input.candidates.get(index))
            .cloned();

        info!("Tally {} -> {}", tally.summary(), election);
        self.archive_result(&run, &input.candidates, &tally, &election, winner.as_ref());
        progress.on_phase_complete(&Phase::Selection);

        Ok(SelectionOutcome {
            run,
            rounds,
            tally,
            election,
            winner,
        })
    }

    fn archive_result(
        &self,
        run: &RunHandle,
        candidates: &CandidateSet,
        tally: &VoteTally,
        election: &Election,
        winner: Option<&Candidate>,
    ) {
        let record = serde_json::json!({
            "candidates": candidates
                .iter()
                .map(|c| serde_json::json!({ "index": c.sequence_index, "source": c.source_id }))
                .collect::<Vec<_>>(),
            "votes": tally
                .entries()
                .map(|(index, votes)| serde_json::json!({ "index": index, "votes": votes }))
                .collect::<Vec<_>>(),
            "rounds": tally.rounds(),
            "election": election,
        });
        match serde_json::to_string_pretty(&record) {
            Ok(json) => archive_best_effort(self.archive.as_ref(), run, TALLY_ARTIFACT, &json),
            Err(e) => warn!("Failed to serialize tally: {}", e),
        }

        if let Some(winner) = winner {
            archive_best_effort(self.archive.as_ref(), run, WINNER_ARTIFACT, &winner.content);
        }
    }
}
