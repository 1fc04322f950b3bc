//! Prompt domain
//!
//! Built-in templates for the comparison, critique and revision stages, and
//! the `{slot}` substitution used to fill both built-in and file templates.

mod template;

pub use template::{PromptTemplate, slots, substitute};
