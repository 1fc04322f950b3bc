//! Role-based model configuration from TOML (`[models]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use thesis_domain::Model;

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// candidates = ["gemini-2.0-flash", "dsr1", "gpt-4.1"]   # Drafting, in query order
/// judge = "dsr1"                                         # Best-of-N voting
/// refiner = "dsr1"                                       # Critique and revision
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Models that draft candidates, queried in this order
    pub candidates: Vec<String>,
    /// Model that votes on candidates
    pub judge: String,
    /// Model that critiques and revises drafts
    pub refiner: String,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            candidates: Model::default_candidates()
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            judge: Model::default().as_str().to_string(),
            refiner: Model::default().as_str().to_string(),
        }
    }
}

impl FileModelsConfig {
    fn parse_single_model(field: &str, value: &str) -> (Option<Model>, Vec<ConfigValidationError>) {
        match value.trim().parse::<Model>() {
            Ok(model) => (Some(model), Vec::new()),
            Err(_) => (
                None,
                vec![ConfigValidationError::UnknownModel {
                    field: format!("models.{}", field),
                    value: value.to_string(),
                }],
            ),
        }
    }

    /// Candidate models, skipping unknown names.
    pub fn parse_candidates(&self) -> (Vec<Model>, Vec<ConfigValidationError>) {
        let mut models = Vec::new();
        let mut issues = Vec::new();
        for name in &self.candidates {
            let (model, errs) = Self::parse_single_model("candidates", name);
            models.extend(model);
            issues.extend(errs);
        }
        if self.candidates.is_empty() {
            issues.push(ConfigValidationError::Empty {
                field: "models.candidates".to_string(),
            });
        }
        (models, issues)
    }

    pub fn parse_judge(&self) -> (Option<Model>, Vec<ConfigValidationError>) {
        Self::parse_single_model("judge", &self.judge)
    }

    pub fn parse_refiner(&self) -> (Option<Model>, Vec<ConfigValidationError>) {
        Self::parse_single_model("refiner", &self.refiner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_cleanly() {
        let config = FileModelsConfig::default();
        let (candidates, issues) = config.parse_candidates();
        assert!(issues.is_empty());
        assert_eq!(candidates, Model::default_candidates());
        assert_eq!(config.parse_judge().0, Some(Model::DeepSeekR1));
    }

    #[test]
    fn test_unknown_names_reported() {
        let config = FileModelsConfig {
            candidates: vec!["gpt-4.1".into(), "gpt-x".into()],
            judge: "claude".into(),
            refiner: "dsv3".into(),
        };
        let (candidates, issues) = config.parse_candidates();
        assert_eq!(candidates, vec![Model::Gpt41]);
        assert_eq!(
            issues,
            vec![ConfigValidationError::UnknownModel {
                field: "models.candidates".into(),
                value: "gpt-x".into()
            }]
        );
        assert_eq!(config.parse_judge().0, None);
        assert_eq!(config.parse_refiner().0, Some(Model::DeepSeekV3));
    }

    #[test]
    fn test_empty_candidate_list() {
        let config = FileModelsConfig {
            candidates: vec![],
            ..Default::default()
        };
        assert_eq!(config.parse_candidates().1.len(), 1);
    }
}
