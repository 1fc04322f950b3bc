//! Pipeline configuration from TOML (`[pipeline]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thesis_application::{PipelineParams, RetryPolicy};

/// Round counts, throttling and retry settings
///
/// # Example
///
/// ```toml
/// [pipeline]
/// comparison_rounds = 5
/// refine_rounds = 10
/// throttle_seconds = 2
/// retry_attempts = 3
/// retry_delay_seconds = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    pub comparison_rounds: usize,
    pub refine_rounds: usize,
    pub throttle_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        let params = PipelineParams::default();
        Self {
            comparison_rounds: params.comparison_rounds,
            refine_rounds: params.refine_rounds,
            throttle_seconds: params.throttle.as_secs(),
            retry_attempts: params.retry.attempts,
            retry_delay_seconds: params.retry.delay.as_secs(),
        }
    }
}

impl FilePipelineConfig {
    pub fn to_params(&self) -> PipelineParams {
        PipelineParams::default()
            .with_comparison_rounds(self.comparison_rounds)
            .with_refine_rounds(self.refine_rounds)
            .with_throttle(Duration::from_secs(self.throttle_seconds))
            .with_retry(RetryPolicy::new(
                self.retry_attempts,
                Duration::from_secs(self.retry_delay_seconds),
            ))
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("pipeline.comparison_rounds", self.comparison_rounds),
            ("pipeline.refine_rounds", self.refine_rounds),
            ("pipeline.retry_attempts", self.retry_attempts as usize),
        ] {
            if value == 0 {
                issues.push(ConfigValidationError::Zero {
                    field: field.to_string(),
                });
            }
        }
        issues
    }
}
