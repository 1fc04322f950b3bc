//! Reasoning-span configuration from TOML (`[reasoning]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use thesis_domain::text::sanitize::{THINK_END, THINK_START};
use thesis_domain::{Model, ReasoningFilter, ReasoningMarkers};

/// Which models get their reasoning stripped, and how it is delimited
///
/// # Example
///
/// ```toml
/// [reasoning]
/// start_marker = "<think>"
/// end_marker = "</think>"
/// models = ["dsr1", "gemini-2.5-pro", "qwen3"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    pub start_marker: String,
    pub end_marker: String,
    pub models: Vec<String>,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            start_marker: THINK_START.to_string(),
            end_marker: THINK_END.to_string(),
            models: Model::ALL
                .iter()
                .filter(|m| m.emits_reasoning())
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }
}

impl FileReasoningConfig {
    pub fn to_filter(&self) -> (ReasoningFilter, Vec<ConfigValidationError>) {
        let mut issues = Vec::new();
        let mut models = Vec::new();
        for name in &self.models {
            match name.parse::<Model>() {
                Ok(model) => models.push(model),
                Err(_) => issues.push(ConfigValidationError::UnknownModel {
                    field: "reasoning.models".to_string(),
                    value: name.clone(),
                }),
            }
        }
        for (field, marker) in [
            ("reasoning.start_marker", &self.start_marker),
            ("reasoning.end_marker", &self.end_marker),
        ] {
            if marker.is_empty() {
                issues.push(ConfigValidationError::Empty {
                    field: field.to_string(),
                });
            }
        }

        let markers = ReasoningMarkers::new(&self.start_marker, &self.end_marker);
        (ReasoningFilter::new(markers, models), issues)
    }
}
