//! Run namespace and artifact naming
//!
//! Artifacts live at `<base>/<scope>/<run id>/<artifact name>`. Run ids are
//! either random (`3f2c…`) or sequenced (`run_<n>_<suffix>`), where `n` is
//! one more than the highest sequence already present under the scope.

use serde::{Deserialize, Serialize};
use std::path::Path;

const SEQUENCE_PREFIX: &str = "run_";

/// Number of trailing path segments used for a sequenced run suffix.
pub const SUFFIX_SEGMENTS: usize = 4;

/// Top-level grouping of runs under the archive base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunScope {
    Generation,
    Comparison,
    Refinement,
}

impl RunScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunScope::Generation => "candidate_generation",
            RunScope::Comparison => "candidate_comparison",
            RunScope::Refinement => "critic_improve",
        }
    }
}

impl std::fmt::Display for RunScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a new run id is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunNaming {
    /// A fresh random token
    Random,
    /// Next sequence number under the scope plus a readable suffix
    Sequenced { suffix: String },
}

impl RunNaming {
    /// Sequenced naming with a suffix derived from the source artifact path.
    pub fn after_path(path: impl AsRef<Path>) -> Self {
        RunNaming::Sequenced {
            suffix: path_suffix(path.as_ref(), SUFFIX_SEGMENTS),
        }
    }
}

/// Sequence number of a run directory name (`run_12_chapter3` → `12`).
pub fn parse_sequence(name: &str) -> Option<u64> {
    let rest = name.strip_prefix(SEQUENCE_PREFIX)?;
    let digits = rest.split('_').next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One past the highest sequence among `existing` names (1 when none).
pub fn next_sequence<'a>(existing: impl IntoIterator<Item = &'a str>) -> u64 {
    existing
        .into_iter()
        .filter_map(parse_sequence)
        .max()
        .map_or(1, |max| max + 1)
}

/// `run_<sequence>_<suffix>`, or `run_<sequence>` for an empty suffix.
pub fn sequenced_run_id(sequence: u64, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("{}{}", SEQUENCE_PREFIX, sequence)
    } else {
        format!("{}{}_{}", SEQUENCE_PREFIX, sequence, suffix)
    }
}

/// Last `segments` normal components of `path`, joined by `_`.
pub fn path_suffix(path: &Path, segments: usize) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let skip = parts.len().saturating_sub(segments);
    parts[skip..].join("_")
}

/// Stage of a refinement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefineStage {
    Critique,
    Revision,
}

impl RefineStage {
    fn stem(&self, round: usize) -> String {
        match self {
            RefineStage::Critique => format!("critique_round_{}", round),
            RefineStage::Revision => format!("draft_round_{}_after", round),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RefineStage::Critique => "critique",
            RefineStage::Revision => "revision",
        }
    }
}

impl std::fmt::Display for RefineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of artifact a stage writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Response exactly as the backend returned it, per attempt
    Raw { attempt: u32 },
    /// Parsed JSON, or a `__parse_error__` marker
    Parsed,
    /// The stage's canonical text (review or revised draft)
    Text,
    /// Input that defeated JSON recovery, per attempt
    FailureDump { attempt: u32 },
}

/// File name of a refinement-stage artifact.
///
/// Raw responses and failure dumps carry the attempt number, so a retry
/// never replaces the evidence of an earlier attempt.
///
/// ```
/// use thesis_domain::archive::{ArtifactKind, RefineStage, stage_artifact};
///
/// assert_eq!(stage_artifact(RefineStage::Critique, 2, ArtifactKind::Text), "critique_round_2_review.txt");
/// assert_eq!(stage_artifact(RefineStage::Revision, 1, ArtifactKind::Parsed), "draft_round_1_after.json");
/// assert_eq!(
///     stage_artifact(RefineStage::Critique, 1, ArtifactKind::Raw { attempt: 2 }),
///     "critique_round_1_attempt_2_raw.txt"
/// );
/// ```
pub fn stage_artifact(stage: RefineStage, round: usize, kind: ArtifactKind) -> String {
    let stem = stage.stem(round);
    match (stage, kind) {
        (_, ArtifactKind::Raw { attempt }) => format!("{}_attempt_{}_raw.txt", stem, attempt),
        (_, ArtifactKind::Parsed) => format!("{}.json", stem),
        (RefineStage::Critique, ArtifactKind::Text) => format!("{}_review.txt", stem),
        (RefineStage::Revision, ArtifactKind::Text) => format!("{}.txt", stem),
        (_, ArtifactKind::FailureDump { attempt }) => {
            format!("{}_attempt_{}_failed_raw.txt", stem, attempt)
        }
    }
}

/// Raw judge answer of a selection round.
pub fn comparison_artifact(round: usize) -> String {
    format!("comparison_{}.txt", round)
}

/// Final candidate text of one model.
pub fn candidate_artifact(source_id: &str) -> String {
    format!("candidate_{}.txt", source_id)
}

/// Unsanitized response of one model, reasoning included.
pub fn candidate_reasoning_artifact(source_id: &str) -> String {
    format!("candidate_{}_with_reasoning.txt", source_id)
}

pub const FINAL_DRAFT_ARTIFACT: &str = "final_draft.txt";
pub const TALLY_ARTIFACT: &str = "tally.json";
pub const WINNER_ARTIFACT: &str = "winner.txt";
