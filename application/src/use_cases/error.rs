//! Errors escalated by the pipeline use cases
//!
//! Backend failures and unreadable answers are absorbed inside each stage
//! (logged, archived, retried or degraded). Only the conditions below stop
//! a run.

use crate::ports::llm_gateway::GatewayError;
use crate::ports::run_archive::ArchiveError;
use thesis_domain::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No valid votes were cast in {rounds} rounds")]
    NoSelection { rounds: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl PipelineError {
    /// Invalid setup rather than a failed run.
    pub fn is_configuration(&self) -> bool {
        match self {
            PipelineError::Domain(e) => e.is_configuration(),
            PipelineError::Gateway(e) => e.is_configuration(),
            _ => false,
        }
    }
}
