//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown model identifier: {0}")]
    InvalidModel(String),

    #[error("No candidates to select from")]
    NoCandidates,

    #[error("Round count must be at least 1")]
    ZeroRounds,
}

impl DomainError {
    /// Whether this error stems from invalid configuration rather than runtime data
    pub fn is_configuration(&self) -> bool {
        matches!(self, DomainError::InvalidModel(_) | DomainError::ZeroRounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_display() {
        let error = DomainError::InvalidModel("gpt-x".to_string());
        assert_eq!(error.to_string(), "Unknown model identifier: gpt-x");
    }

    #[test]
    fn test_is_configuration() {
        assert!(DomainError::InvalidModel("x".into()).is_configuration());
        assert!(DomainError::ZeroRounds.is_configuration());
        assert!(!DomainError::NoCandidates.is_configuration());
    }
}
