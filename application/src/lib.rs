//! Application layer for thesis-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PipelineParams, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    run_archive::{ArchiveError, InMemoryRunArchive, RunArchive, RunHandle},
};
pub use use_cases::error::PipelineError;
pub use use_cases::generate_candidates::{
    ExcludedModel, GenerateCandidatesInput, GenerateCandidatesUseCase, GenerationOutcome,
};
pub use use_cases::refine_draft::{RefineDraftInput, RefineDraftUseCase, RefinementOutcome};
pub use use_cases::select_candidate::{
    SelectCandidateInput, SelectCandidateUseCase, SelectionOutcome,
};
pub use use_cases::write_section::{SectionOutcome, WriteSectionInput, WriteSectionUseCase};
