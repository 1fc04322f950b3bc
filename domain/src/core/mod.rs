//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the closed set of drafting/judging models
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe previews for log lines

pub mod error;
pub mod model;
pub mod string;
