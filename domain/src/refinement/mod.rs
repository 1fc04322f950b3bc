//! Iterative refinement domain
//!
//! A draft goes through a fixed number of rounds. Each round asks a critic
//! for a review and a reviser for a new draft; see [`state::RefinementState`]
//! for the transition rules.

pub mod state;

pub use state::{RefinedDraft, RefinementRound, RefinementState};
