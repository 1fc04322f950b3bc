//! Pipeline orchestration domain
//!
//! Phases a run moves through, reported to progress observers.

pub mod entities;
