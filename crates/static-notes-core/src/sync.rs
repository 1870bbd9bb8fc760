//! Destructive mirror of the build output into the served directory
//!
//! The build writes to its own output directory while the dev/preview
//! server exposes a different one. [`MirrorSync::run`] deletes the target
//! and copies the source over it. [`MirrorSync::plan`] reports what a run
//! would do without touching anything.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::error::{NotesError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub source_exists: bool,
    /// Target exists and would be deleted first
    pub replaces_target: bool,
    /// Files to copy, relative to the source
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to mirror; the target was left alone
    SourceMissing,
    Mirrored { files: usize },
}

#[derive(Debug, Clone)]
pub struct MirrorSync {
    source: PathBuf,
    target: PathBuf,
}

impl MirrorSync {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    fn error(&self, reason: impl std::fmt::Display) -> NotesError {
        NotesError::sync(&self.source, &self.target, reason)
    }

    /// Source and target must be disjoint trees
    fn check_preconditions(&self) -> Result<()> {
        let source = resolved(&self.source);
        let target = resolved(&self.target);
        if source == target {
            return Err(self.error("source and target are the same directory"));
        }
        if target.starts_with(&source) {
            return Err(self.error("target is inside source"));
        }
        if source.starts_with(&target) {
            return Err(self.error("source is inside target"));
        }
        Ok(())
    }

    /// What [`run`](Self::run) would do
    pub fn plan(&self) -> Result<SyncPlan> {
        self.check_preconditions()?;
        if !self.source.is_dir() {
            return Ok(SyncPlan {
                source_exists: false,
                replaces_target: false,
                files: Vec::new(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.source).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| self.error(e))?;
            if entry.file_type().is_file() {
                files.push(self.relative(entry.path())?);
            }
        }

        Ok(SyncPlan {
            source_exists: true,
            replaces_target: self.target.exists(),
            files,
        })
    }

    /// Delete the target, then copy the source tree into it
    #[tracing::instrument(skip(self), fields(source = %self.source.display(), target = %self.target.display()))]
    pub fn run(&self) -> Result<SyncOutcome> {
        self.check_preconditions()?;
        if !self.source.is_dir() {
            info!("Sync source missing, nothing to do");
            return Ok(SyncOutcome::SourceMissing);
        }

        if self.target.exists() {
            fs::remove_dir_all(&self.target).map_err(|e| self.error(e))?;
        }
        fs::create_dir_all(&self.target).map_err(|e| self.error(e))?;

        let mut files = 0;
        for entry in WalkDir::new(&self.source).min_depth(1) {
            let entry = entry.map_err(|e| self.error(e))?;
            let dest = self.target.join(self.relative(entry.path())?);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest).map_err(|e| self.error(e))?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &dest).map_err(|e| self.error(e))?;
                files += 1;
            }
        }

        info!(files, "Mirrored output");
        Ok(SyncOutcome::Mirrored { files })
    }

    fn relative(&self, path: &Path) -> Result<PathBuf> {
        path.strip_prefix(&self.source)
            .map(Path::to_path_buf)
            .map_err(|e| self.error(e))
    }
}

fn resolved(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn populate(dir: &Path) {
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("index.json"), "{}").unwrap();
        fs::write(dir.join("a.md.json"), "{}").unwrap();
        fs::write(dir.join("nested/b.json"), "{}").unwrap();
    }

    #[test]
    fn test_missing_source_is_noop() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("public");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let sync = MirrorSync::new(dir.path().join("build"), &target);
        assert_eq!(sync.run().unwrap(), SyncOutcome::SourceMissing);
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn test_mirror_replaces_target() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("build");
        let target = dir.path().join("public/static-notes");
        populate(&source);
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.md.json"), "old").unwrap();

        let outcome = MirrorSync::new(&source, &target).run().unwrap();

        assert_eq!(outcome, SyncOutcome::Mirrored { files: 3 });
        assert!(target.join("index.json").exists());
        assert!(target.join("nested/b.json").exists());
        assert!(!target.join("stale.md.json").exists());
        assert!(source.join("a.md.json").exists());
    }

    #[test]
    fn test_plan_is_dry_run() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("build");
        let target = dir.path().join("public");
        populate(&source);
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.json"), "old").unwrap();

        let plan = MirrorSync::new(&source, &target).plan().unwrap();

        assert!(plan.source_exists);
        assert!(plan.replaces_target);
        assert_eq!(
            plan.files,
            vec![
                PathBuf::from("a.md.json"),
                PathBuf::from("index.json"),
                PathBuf::from("nested/b.json"),
            ]
        );
        assert!(target.join("stale.json").exists());
        assert!(!target.join("index.json").exists());
    }

    #[test]
    fn test_overlapping_paths_are_rejected() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("build");
        populate(&source);

        for target in [source.clone(), source.join("nested"), dir.path().to_path_buf()] {
            let err = MirrorSync::new(&source, &target).run().unwrap_err();
            assert!(matches!(err, NotesError::Sync { .. }));
        }
        assert!(source.join("index.json").exists());
    }
}
