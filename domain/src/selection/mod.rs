//! Candidate selection domain
//!
//! Best-of-N selection asks a judge model the same comparison question
//! several times and keeps the plurality answer.
//!
//! ```text
//! CandidateSet ──► comparison prompt ──► round 1..=R ──► VoteChoice
//!                                                          │
//!                                        VoteTally ◄───────┘
//!                                            │
//!                                            ▼
//!                              Election::Winner | Election::NoSelection
//! ```
//!
//! Repeating the question smooths out the judge's sampling noise; rounds
//! whose answer cannot be read as a candidate number are kept for the
//! record but cast no vote.

pub mod candidate;
pub mod parsing;
pub mod round;
pub mod tally;

pub use candidate::{Candidate, CandidateSet};
pub use parsing::{VoteChoice, first_integer_token, parse_choice};
pub use round::SelectionRound;
pub use tally::{Election, VoteTally};
