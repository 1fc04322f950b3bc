//! Pipeline parameters: use case loop control.
//!
//! These are application-layer concerns, not domain policy: how often a
//! stage is retried, how long to wait between calls, how many rounds run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never below 1.
    pub attempts: u32,
    /// Pause between two attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Retry without waiting, for tests and offline runs.
    pub fn immediate(attempts: u32) -> Self {
        Self::new(attempts, Duration::ZERO)
    }

    /// Whether another attempt follows `attempt` (1-indexed).
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.attempts
    }
}

/// Static parameters shared by the pipeline use cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Voting rounds per selection
    pub comparison_rounds: usize,
    /// Critique→revise rounds per refinement
    pub refine_rounds: usize,
    /// Pause between consecutive generation calls
    pub throttle: Duration,
    /// Retry policy of the critique and revise stages
    pub retry: RetryPolicy,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            comparison_rounds: 5,
            refine_rounds: 10,
            throttle: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineParams {
    // ==================== Builder Methods ====================

    pub fn with_comparison_rounds(mut self, rounds: usize) -> Self {
        self.comparison_rounds = rounds;
        self
    }

    pub fn with_refine_rounds(mut self, rounds: usize) -> Self {
        self.refine_rounds = rounds;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
