//! Application-level configuration.
//!
//! - [`RetryPolicy`]: attempts and back-off for the critique and revise stages
//! - [`PipelineParams`]: round counts and throttling for the pipeline use cases

pub mod pipeline_params;

pub use pipeline_params::{PipelineParams, RetryPolicy};
