//! Critique→revise state machine

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Outcome of one critique→revise round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementRound {
    /// Round number (1-indexed)
    pub round: usize,
    /// Review text, `None` when the critique stage gave up
    pub critique: Option<String>,
    /// Revised draft, `None` when the revise stage gave up
    pub revision: Option<String>,
    /// Whether the revision replaced the draft
    pub applied: bool,
}

/// Draft under refinement plus the bounded round counter.
///
/// The counter always advances, whether or not a round produced a usable
/// revision; a failed round leaves the draft as it was.
#[derive(Debug, Clone)]
pub struct RefinementState {
    draft: String,
    next_round: usize,
    rounds: usize,
    history: Vec<RefinementRound>,
}

impl RefinementState {
    pub fn new(initial_draft: impl Into<String>, rounds: usize) -> Result<Self, DomainError> {
        if rounds == 0 {
            return Err(DomainError::ZeroRounds);
        }
        Ok(Self {
            draft: initial_draft.into(),
            next_round: 1,
            rounds,
            history: Vec::with_capacity(rounds),
        })
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The round about to run, or `None` once the bound is reached.
    pub fn current_round(&self) -> Option<usize> {
        (self.next_round <= self.rounds).then_some(self.next_round)
    }

    pub fn is_finished(&self) -> bool {
        self.current_round().is_none()
    }

    pub fn history(&self) -> &[RefinementRound] {
        &self.history
    }

    /// Close the current round. A non-blank revision becomes the new draft.
    ///
    /// Calls after the final round are ignored.
    pub fn complete_round(&mut self, critique: Option<String>, revision: Option<String>) {
        let Some(round) = self.current_round() else {
            return;
        };

        let applied = match revision.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                self.draft = text.to_string();
                true
            }
            _ => false,
        };

        self.history.push(RefinementRound {
            round,
            critique,
            revision,
            applied,
        });
        self.next_round += 1;
    }

    pub fn finish(self) -> RefinedDraft {
        RefinedDraft {
            final_draft: self.draft,
            history: self.history,
        }
    }
}

/// Terminal state of a refinement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedDraft {
    pub final_draft: String,
    pub history: Vec<RefinementRound>,
}

impl RefinedDraft {
    pub fn rounds_run(&self) -> usize {
        self.history.len()
    }

    pub fn revisions_applied(&self) -> usize {
        self.history.iter().filter(|r| r.applied).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rounds_rejected() {
        assert_eq!(
            RefinementState::new("draft", 0).unwrap_err(),
            DomainError::ZeroRounds
        );
    }

    #[test]
    fn test_revision_advances_draft() {
        let mut state = RefinementState::new("v0", 2).unwrap();
        assert_eq!(state.current_round(), Some(1));
        state.complete_round(Some("too long".into()), Some("v1".into()));
        assert_eq!(state.draft(), "v1");
        assert_eq!(state.current_round(), Some(2));
    }

    #[test]
    fn test_failed_round_keeps_draft_and_advances_counter() {
        let mut state = RefinementState::new("v0", 2).unwrap();
        state.complete_round(None, None);
        assert_eq!(state.draft(), "v0");
        assert_eq!(state.current_round(), Some(2));

        state.complete_round(None, Some("   ".into()));
        assert_eq!(state.draft(), "v0");
        assert!(state.is_finished());

        let done = state.finish();
        assert_eq!(done.rounds_run(), 2);
        assert_eq!(done.revisions_applied(), 0);
    }

    #[test]
    fn test_no_rounds_after_bound() {
        let mut state = RefinementState::new("v0", 1).unwrap();
        state.complete_round(None, Some("v1".into()));
        state.complete_round(None, Some("v2".into()));
        let done = state.finish();
        assert_eq!(done.final_draft, "v1");
        assert_eq!(done.history.len(), 1);
    }
}
