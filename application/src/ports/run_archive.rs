//! Run archive port
//!
//! Every pipeline invocation gets its own namespace under a scope and
//! writes named text artifacts into it. Namespaces are never shared and
//! artifacts are only ever added or overwritten, never removed.

use std::collections::BTreeMap;
use std::sync::Mutex;
use thesis_domain::archive::{RunNaming, RunScope, next_sequence, sequenced_run_id};
use thiserror::Error;

/// Errors raised by archive adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Failed to create run {run}: {message}")]
    CreateRun { run: String, message: String },

    #[error("Failed to write {artifact}: {message}")]
    Write { artifact: String, message: String },

    #[error("Failed to read {artifact}: {message}")]
    Read { artifact: String, message: String },

    #[error("Artifact not found: {0}")]
    NotFound(String),
}

/// Identifies one run namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunHandle {
    pub scope: RunScope,
    pub id: String,
}

impl RunHandle {
    pub fn new(scope: RunScope, id: impl Into<String>) -> Self {
        Self {
            scope,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.scope, self.id)
    }
}

/// Storage for run namespaces and their artifacts
pub trait RunArchive: Send + Sync {
    /// Create a fresh namespace under `scope`. The returned id is not in use
    /// by any other run.
    fn open_run(&self, scope: RunScope, naming: &RunNaming) -> Result<RunHandle, ArchiveError>;

    fn write(&self, run: &RunHandle, artifact: &str, content: &str) -> Result<(), ArchiveError>;

    fn read(&self, run: &RunHandle, artifact: &str) -> Result<String, ArchiveError>;

    /// Run ids currently present under `scope`.
    fn list_runs(&self, scope: RunScope) -> Result<Vec<String>, ArchiveError>;

    /// Human-readable location of a run, for console output.
    fn location(&self, run: &RunHandle) -> String {
        run.to_string()
    }
}

type Runs = BTreeMap<(RunScope, String), BTreeMap<String, String>>;

/// Archive kept in memory, used by tests and dry runs.
#[derive(Default)]
pub struct InMemoryRunArchive {
    runs: Mutex<Runs>,
}

impl InMemoryRunArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact names of a run, sorted.
    pub fn artifacts(&self, run: &RunHandle) -> Vec<String> {
        self.runs
            .lock()
            .map(|runs| {
                runs.get(&(run.scope, run.id.clone()))
                    .map(|artifacts| artifacts.keys().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Runs>, ArchiveError> {
        self.runs.lock().map_err(|e| ArchiveError::CreateRun {
            run: String::new(),
            message: e.to_string(),
        })
    }
}

impl RunArchive for InMemoryRunArchive {
    fn open_run(&self, scope: RunScope, naming: &RunNaming) -> Result<RunHandle, ArchiveError> {
        let mut runs = self.lock()?;
        let id = match naming {
            RunNaming::Random => uuid::Uuid::new_v4().to_string(),
            RunNaming::Sequenced { suffix } => {
                let existing = runs
                    .keys()
                    .filter(|(s, _)| *s == scope)
                    .map(|(_, id)| id.as_str());
                sequenced_run_id(next_sequence(existing), suffix)
            }
        };
        runs.insert((scope, id.clone()), BTreeMap::new());
        Ok(RunHandle::new(scope, id))
    }

    fn write(&self, run: &RunHandle, artifact: &str, content: &str) -> Result<(), ArchiveError> {
        let mut runs = self.lock()?;
        runs.entry((run.scope, run.id.clone()))
            .or_default()
            .insert(artifact.to_string(), content.to_string());
        Ok(())
    }

    fn read(&self, run: &RunHandle, artifact: &str) -> Result<String, ArchiveError> {
        let runs = self.lock()?;
        runs.get(&(run.scope, run.id.clone()))
            .and_then(|artifacts| artifacts.get(artifact))
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(format!("{}/{}", run, artifact)))
    }

    fn list_runs(&self, scope: RunScope) -> Result<Vec<String>, ArchiveError> {
        let runs = self.lock()?;
        Ok(runs
            .keys()
            .filter(|(s, _)| *s == scope)
            .map(|(_, id)| id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesis_domain::archive::parse_sequence;

    #[test]
    fn test_sequenced_runs_increase() {
        let archive = InMemoryRunArchive::new();
        let naming = RunNaming::after_path("thesis/ch3/method/best.txt");

        let first = archive.open_run(RunScope::Refinement, &naming).unwrap();
        let second = archive.open_run(RunScope::Refinement, &naming).unwrap();

        assert_eq!(first.id, "run_1_thesis_ch3_method_best.txt");
        assert_ne!(first, second);
        assert!(parse_sequence(&second.id).unwrap() > parse_sequence(&first.id).unwrap());
    }

    #[test]
    fn test_scopes_are_independent() {
        let archive = InMemoryRunArchive::new();
        let naming = RunNaming::Sequenced {
            suffix: "x".to_string(),
        };
        archive.open_run(RunScope::Refinement, &naming).unwrap();
        let other = archive.open_run(RunScope::Generation, &naming).unwrap();
        assert_eq!(other.id, "run_1_x");
    }

    #[test]
    fn test_random_runs_are_distinct() {
        let archive = InMemoryRunArchive::new();
        let a = archive.open_run(RunScope::Comparison, &RunNaming::Random).unwrap();
        let b = archive.open_run(RunScope::Comparison, &RunNaming::Random).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(archive.list_runs(RunScope::Comparison).unwrap().len(), 2);
    }

    #[test]
    fn test_write_read_and_overwrite() {
        let archive = InMemoryRunArchive::new();
        let run = archive.open_run(RunScope::Comparison, &RunNaming::Random).unwrap();

        archive.write(&run, "comparison_1.txt", "2").unwrap();
        archive.write(&run, "comparison_1.txt", "3").unwrap();

        assert_eq!(archive.read(&run, "comparison_1.txt").unwrap(), "3");
        assert!(matches!(
            archive.read(&run, "missing.txt"),
            Err(ArchiveError::NotFound(_))
        ));
        assert_eq!(archive.artifacts(&run), vec!["comparison_1.txt".to_string()]);
    }
}
