//! Run archive naming rules.
//!
//! Pure functions only: how runs and artifacts are named. Storage lives
//! behind the `RunArchive` port in the application layer.

pub mod naming;

pub use naming::{
    ArtifactKind, FINAL_DRAFT_ARTIFACT, RefineStage, RunNaming, RunScope, TALLY_ARTIFACT,
    WINNER_ARTIFACT, candidate_artifact, candidate_reasoning_artifact, comparison_artifact,
    next_sequence, parse_sequence, path_suffix, sequenced_run_id, stage_artifact,
};
