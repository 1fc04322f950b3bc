//! Post-processing of raw model text.
//!
//! - [`sanitize`] strips reasoning spans so only the final answer remains
//! - [`extract`] recovers JSON values from noisy responses

pub mod extract;
pub mod sanitize;

pub use extract::{ExtractionError, extract_json};
pub use sanitize::{ReasoningFilter, ReasoningMarkers, sanitize};
