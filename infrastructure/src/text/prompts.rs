//! Prompt set assembly: configured files over built-in templates.

use super::loader::{TextLoadError, load_text};
use crate::config::FilePromptsConfig;
use std::path::Path;
use thesis_domain::PromptTemplate;

/// The four prompt texts the pipeline uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub system: String,
    pub compare: String,
    pub critique: String,
    pub revise: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            system: PromptTemplate::system().to_string(),
            compare: PromptTemplate::compare().to_string(),
            critique: PromptTemplate::critique().to_string(),
            revise: PromptTemplate::revise().to_string(),
        }
    }
}

impl PromptSet {
    /// Load every configured override. A configured file that is missing is
    /// an error rather than a silent fallback.
    pub fn load(config: &FilePromptsConfig) -> Result<Self, TextLoadError> {
        let builtin = Self::default();
        Ok(Self {
            system: pick(config.system.as_deref(), builtin.system)?,
            compare: pick(config.compare.as_deref(), builtin.compare)?,
            critique: pick(config.critique.as_deref(), builtin.critique)?,
            revise: pick(config.revise.as_deref(), builtin.revise)?,
        })
    }
}

fn pick(path: Option<&Path>, builtin: String) -> Result<String, TextLoadError> {
    match path {
        Some(path) => load_text(path),
        None => Ok(builtin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_when_nothing_configured() {
        let prompts = PromptSet::load(&FilePromptsConfig::default()).unwrap();
        assert_eq!(prompts, PromptSet::default());
    }

    #[test]
    fn test_override_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let critique = dir.path().join("critique.txt");
        std::fs::write(&critique, "Review {draft}").unwrap();

        let mut config = FilePromptsConfig {
            critique: Some(critique),
            ..Default::default()
        };
        let prompts = PromptSet::load(&config).unwrap();
        assert_eq!(prompts.critique, "Review {draft}");
        assert_eq!(prompts.revise, PromptTemplate::revise());

        config.system = Some(dir.path().join("absent.txt"));
        assert!(matches!(
            PromptSet::load(&config),
            Err(TextLoadError::NotFound(_))
        ));
    }
}
