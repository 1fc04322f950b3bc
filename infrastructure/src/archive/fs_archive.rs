//! Run archive on the local filesystem
//!
//! Layout: `<base>/<scope>/<run-id>/<artifact>`. A run directory is claimed
//! with `create_dir`, which fails when the directory already exists, so two
//! processes never share a namespace.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thesis_application::ports::run_archive::{ArchiveError, RunArchive, RunHandle};
use thesis_domain::archive::{RunNaming, RunScope, next_sequence, sequenced_run_id};
use tracing::debug;

/// Archive rooted at a base directory
#[derive(Debug, Clone)]
pub struct FsRunArchive {
    base: PathBuf,
}

impl FsRunArchive {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn scope_dir(&self, scope: RunScope) -> PathBuf {
        self.base.join(scope.as_str())
    }

    /// Directory of a run.
    pub fn run_dir(&self, run: &RunHandle) -> PathBuf {
        self.scope_dir(run.scope).join(&run.id)
    }

    fn entries(dir: &Path) -> Result<Vec<String>, ArchiveError> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ArchiveError::Read {
                    artifact: dir.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        let mut names: Vec<String> = read
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Try to claim `dir`; `Ok(false)` means somebody else owns it.
    fn claim(dir: &Path) -> Result<bool, ArchiveError> {
        match fs::create_dir(dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(ArchiveError::CreateRun {
                run: dir.display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl RunArchive for FsRunArchive {
    fn open_run(&self, scope: RunScope, naming: &RunNaming) -> Result<RunHandle, ArchiveError> {
        let scope_dir = self.scope_dir(scope);
        fs::create_dir_all(&scope_dir).map_err(|e| ArchiveError::CreateRun {
            run: scope_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let id = match naming {
            RunNaming::Random => loop {
                let id = uuid::Uuid::new_v4().to_string();
                if Self::claim(&scope_dir.join(&id))? {
                    break id;
                }
            },
            RunNaming::Sequenced { suffix } => {
                let existing = Self::entries(&scope_dir)?;
                let mut sequence = next_sequence(existing.iter().map(String::as_str));
                loop {
                    let id = sequenced_run_id(sequence, suffix);
                    if Self::claim(&scope_dir.join(&id))? {
                        break id;
                    }
                    debug!("Run {} already taken, trying the next sequence", id);
                    sequence += 1;
                }
            }
        };

        Ok(RunHandle::new(scope, id))
    }

    fn write(&self, run: &RunHandle, artifact: &str, content: &str) -> Result<(), ArchiveError> {
        let path = self.run_dir(run).join(artifact);
        let to_error = |e: std::io::Error| ArchiveError::Write {
            artifact: path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        fs::write(&path, content).map_err(to_error)
    }

    fn read(&self, run: &RunHandle, artifact: &str) -> Result<String, ArchiveError> {
        let path = self.run_dir(run).join(artifact);
        fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ArchiveError::NotFound(path.display().to_string())
            } else {
                ArchiveError::Read {
                    artifact: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn list_runs(&self, scope: RunScope) -> Result<Vec<String>, ArchiveError> {
        Self::entries(&self.scope_dir(scope))
    }

    fn location(&self, run: &RunHandle) -> String {
        self.run_dir(run).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesis_domain::archive::parse_sequence;

    #[test]
    fn test_sequenced_runs_strictly_increase() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsRunArchive::new(dir.path());
        let naming = RunNaming::after_path("thesis/ch3/method/best.txt");

        let first = archive.open_run(RunScope::Refinement, &naming).unwrap();
        let second = archive.open_run(RunScope::Refinement, &naming).unwrap();

        assert_eq!(first.id, "run_1_thesis_ch3_method_best.txt");
        assert_eq!(second.id, "run_2_thesis_ch3_method_best.txt");
        assert!(dir.path().join("critic_improve").join(&second.id).is_dir());
        assert!(parse_sequence(&second.id) > parse_sequence(&first.id));
    }

    #[test]
    fn test_sequence_continues_after_other_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let scope_dir = dir.path().join("critic_improve");
        fs::create_dir_all(scope_dir.join("run_7_a_b_c_d.txt")).unwrap();
        fs::create_dir_all(scope_dir.join("notes")).unwrap();

        let archive = FsRunArchive::new(dir.path());
        let run = archive
            .open_run(
                RunScope::Refinement,
                &RunNaming::Sequenced {
                    suffix: "x".to_string(),
                },
            )
            .unwrap();
        assert_eq!(run.id, "run_8_x");
    }

    #[test]
    fn test_random_runs_get_their_own_directory() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsRunArchive::new(dir.path());

        let a = archive.open_run(RunScope::Generation, &RunNaming::Random).unwrap();
        let b = archive.open_run(RunScope::Generation, &RunNaming::Random).unwrap();

        assert_ne!(a.id, b.id);
        let mut runs = archive.list_runs(RunScope::Generation).unwrap();
        runs.sort();
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(runs, expected);
        assert!(archive.list_runs(RunScope::Comparison).unwrap().is_empty());
    }

    #[test]
    fn test_write_read_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FsRunArchive::new(dir.path().join("nested").join("base"));
        let run = archive.open_run(RunScope::Comparison, &RunNaming::Random).unwrap();

        archive.write(&run, "comparison_1.txt", "候选 2").unwrap();
        assert_eq!(archive.read(&run, "comparison_1.txt").unwrap(), "候选 2");
        archive.write(&run, "comparison_1.txt", "3").unwrap();
        assert_eq!(archive.read(&run, "comparison_1.txt").unwrap(), "3");

        assert!(matches!(
            archive.read(&run, "tally.json"),
            Err(ArchiveError::NotFound(_))
        ));
        assert!(archive.location(&run).ends_with(&run.id));
    }
}
