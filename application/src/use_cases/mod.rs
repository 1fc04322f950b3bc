//! Use cases (application services)
//!
//! - [`generate_candidates`]: every model drafts the section
//! - [`select_candidate`]: best-of-N voting over candidates
//! - [`write_section`]: generation followed by selection
//! - [`refine_draft`]: bounded critique→revise loop

pub mod error;
pub mod generate_candidates;
pub mod refine_draft;
pub mod select_candidate;
pub(crate) mod shared;
pub mod write_section;
