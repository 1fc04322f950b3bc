//! Prompt template overrides from TOML (`[prompts]` section)
//!
//! Each entry points at a text file that replaces the built-in template.
//! Unset entries keep the built-in text.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [prompts]
/// system = "prompts/system.txt"
/// compare = "prompts/compare.txt"
/// critique = "prompts/critique.txt"
/// revise = "prompts/revise.txt"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub system: Option<PathBuf>,
    pub compare: Option<PathBuf>,
    pub critique: Option<PathBuf>,
    pub revise: Option<PathBuf>,
}
