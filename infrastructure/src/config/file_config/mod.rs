//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain and application
//! types by their `parse_*`/`to_*` helpers.

mod archive;
mod backends;
mod logging;
mod models;
mod pipeline;
mod prompts;
mod reasoning;

pub use archive::FileArchiveConfig;
pub use backends::{FileBackendConfig, FileRouteConfig, default_backends, default_routes};
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use pipeline::FilePipelineConfig;
pub use prompts::FilePromptsConfig;
pub use reasoning::FileReasoningConfig;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thesis_domain::Model;
use thiserror::Error;

/// A problem found while validating the configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field}: unknown model '{value}'")]
    UnknownModel { field: String, value: String },

    #[error("{field} must not be empty")]
    Empty { field: String },

    #[error("{field} must be greater than zero")]
    Zero { field: String },

    #[error("routes.{model}: backend '{backend}' is not defined in [backends]")]
    UnknownBackend { model: String, backend: String },

    #[error("routes.{0}: no such model")]
    UnknownRoute(String),

    #[error("model '{0}' has no entry in [routes]")]
    MissingRoute(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// OpenAI-compatible endpoints, by name
    pub backends: BTreeMap<String, FileBackendConfig>,
    /// Model identifier to backend mapping
    pub routes: BTreeMap<String, FileRouteConfig>,
    /// Round counts, throttle and retry
    pub pipeline: FilePipelineConfig,
    /// Run archive location
    pub archive: FileArchiveConfig,
    /// Reasoning-span removal
    pub reasoning: FileReasoningConfig,
    /// Prompt template overrides
    pub prompts: FilePromptsConfig,
    /// Log files
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            models: FileModelsConfig::default(),
            backends: default_backends(),
            routes: default_routes(),
            pipeline: FilePipelineConfig::default(),
            archive: FileArchiveConfig::default(),
            reasoning: FileReasoningConfig::default(),
            prompts: FilePromptsConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Missing API keys are not checked here; they are resolved from the
    /// environment when the gateway is built, and only for models in use.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        // Model names
        let (candidates, errs) = self.models.parse_candidates();
        issues.extend(errs);
        let (judge, errs) = self.models.parse_judge();
        issues.extend(errs);
        let (refiner, errs) = self.models.parse_refiner();
        issues.extend(errs);

        // Routes
        for (name, route) in &self.routes {
            if name.parse::<Model>().is_err() {
                issues.push(ConfigValidationError::UnknownRoute(name.clone()));
            }
            if !self.backends.contains_key(&route.backend) {
                issues.push(ConfigValidationError::UnknownBackend {
                    model: name.clone(),
                    backend: route.backend.clone(),
                });
            }
        }
        let mut in_use: Vec<Model> = candidates;
        in_use.extend(judge);
        in_use.extend(refiner);
        in_use.sort();
        in_use.dedup();
        for model in in_use {
            if !self.routes.contains_key(model.as_str()) {
                issues.push(ConfigValidationError::MissingRoute(model.as_str().to_string()));
            }
        }

        issues.extend(self.pipeline.validate());
        issues.extend(self.reasoning.to_filter().1);

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[models]
candidates = ["gpt-4.1", "dsv3"]
judge = "gemini-2.5-pro"
refiner = "dsr1"

[backends.yidong]
base_url = "http://localhost:8000/v1"
api_key_env = "LOCAL_KEY"

[routes.doubao]
backend = "ark"
remote_name = "ep-20250101-abcde"

[pipeline]
comparison_rounds = 3
refine_rounds = 4

[archive]
base_dir = "/tmp/runs"

[logging]
conversation_log = "conv.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.candidates, vec!["gpt-4.1", "dsv3"]);
        assert_eq!(config.models.parse_judge().0, Some(Model::Gemini25Pro));
        assert_eq!(
            config.backends["yidong"].base_url.as_deref(),
            Some("http://localhost:8000/v1")
        );
        assert_eq!(config.routes["doubao"].remote_name, "ep-20250101-abcde");
        assert_eq!(config.pipeline.comparison_rounds, 3);
        // Unset keys in a present section keep their defaults
        assert_eq!(config.pipeline.retry_attempts, 3);
        assert_eq!(config.archive.base_dir.to_str(), Some("/tmp/runs"));
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let mut config = FileConfig::default();
        config.models.judge = "claude".into();
        config.routes.insert(
            "gpt-4.1".into(),
            FileRouteConfig {
                backend: "azure".into(),
                remote_name: "gpt-4.1".into(),
            },
        );
        config.routes.remove("dsv3");
        config.pipeline.comparison_rounds = 0;

        let issues = config.validate();
        assert!(issues.contains(&ConfigValidationError::UnknownModel {
            field: "models.judge".into(),
            value: "claude".into()
        }));
        assert!(issues.contains(&ConfigValidationError::UnknownBackend {
            model: "gpt-4.1".into(),
            backend: "azure".into()
        }));
        assert!(issues.contains(&ConfigValidationError::MissingRoute("dsv3".into())));
        assert!(issues.contains(&ConfigValidationError::Zero {
            field: "pipeline.comparison_rounds".into()
        }));
    }

    #[test]
    fn test_unknown_route_reported() {
        let mut config = FileConfig::default();
        config.routes.insert(
            "llama".into(),
            FileRouteConfig {
                backend: "openai".into(),
                remote_name: "llama-3".into(),
            },
        );
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::UnknownRoute("llama".into())]
        );
    }
}
