//! Pipeline phase entities

use serde::{Deserialize, Serialize};

/// Phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Every candidate model drafts the section
    Generation,
    /// A judge model votes on the candidates
    Selection,
    /// A critic reviews the current draft
    Critique,
    /// A reviser rewrites the draft from the review
    Revision,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Generation => "generation",
            Phase::Selection => "selection",
            Phase::Critique => "critique",
            Phase::Revision => "revision",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Generation => "Candidate Generation",
            Phase::Selection => "Best-of-N Selection",
            Phase::Critique => "Critique",
            Phase::Revision => "Revision",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Selection.as_str(), "selection");
        assert_eq!(Phase::Revision.to_string(), "Revision");
    }
}
