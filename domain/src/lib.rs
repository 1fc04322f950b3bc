//! Domain layer for thesis-quorum
//!
//! Pure logic for turning a research paper into a thesis section with
//! several language models. No I/O happens here.
//!
//! # Core Concepts
//!
//! ## Best-of-N selection
//!
//! Several models draft the same section. A judge model is asked the same
//! comparison question repeatedly and the plurality answer wins.
//!
//! ## Critique and revise
//!
//! A draft goes through a bounded number of rounds in which one model
//! reviews it and another rewrites it from the review.
//!
//! ## Response cleanup
//!
//! Reasoning models wrap their chain of thought in marker tags, and JSON
//! answers arrive wrapped in prose or code fences. The [`text`] module
//! strips the former and recovers the latter.

pub mod archive;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod refinement;
pub mod selection;
pub mod session;
pub mod text;

// Re-export commonly used types
pub use archive::{ArtifactKind, RefineStage, RunNaming, RunScope};
pub use core::{error::DomainError, model::Model};
pub use orchestration::entities::Phase;
pub use prompt::PromptTemplate;
pub use refinement::{RefinedDraft, RefinementRound, RefinementState};
pub use selection::{
    Candidate, CandidateSet, Election, SelectionRound, VoteChoice, VoteTally, parse_choice,
};
pub use session::entities::{Message, Role};
pub use text::{ExtractionError, ReasoningFilter, ReasoningMarkers, extract_json, sanitize};
