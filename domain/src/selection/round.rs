//! A single selection trial

use super::parsing::{VoteChoice, parse_choice};
use serde::{Deserialize, Serialize};

/// One independent voting round: what the judge said and what it counted as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRound {
    /// Round number (1-indexed)
    pub round: usize,
    pub raw_response: String,
    pub sanitized_response: String,
    pub choice: VoteChoice,
}

impl SelectionRound {
    /// Interpret a judge answer for a candidate set of size `candidate_count`.
    pub fn judged(
        round: usize,
        raw_response: impl Into<String>,
        sanitized_response: impl Into<String>,
        candidate_count: usize,
    ) -> Self {
        let sanitized_response = sanitized_response.into();
        let choice = parse_choice(&sanitized_response, candidate_count);
        Self {
            round,
            raw_response: raw_response.into(),
            sanitized_response,
            choice,
        }
    }

    /// A round whose judge call failed before any answer arrived.
    pub fn failed(round: usize, reason: impl Into<String>) -> Self {
        Self {
            round,
            raw_response: String::new(),
            sanitized_response: String::new(),
            choice: VoteChoice::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn extracted_choice(&self) -> Option<usize> {
        self.choice.index()
    }
}
