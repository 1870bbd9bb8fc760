//! Output directory of compiled artifacts
//!
//! Layout:
//! - `index.json` - the manifest
//! - `<filename>.json` - one compiled note per public source note
//!   (e.g. `2024-01-01-10-00-00.md.json`)
//!
//! Every file is written to a temporary sibling and renamed into place, so
//! readers never observe a partially written artifact.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{NotesError, Result};
use crate::index::{Manifest, INDEX_FILE};
use crate::note::{artifact_file_name, CompiledNote};

const ARTIFACT_SUFFIX: &str = ".md.json";

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it is missing
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| NotesError::write(&self.output_dir, e))
    }

    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(artifact_file_name(filename))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_FILE)
    }

    /// Write one compiled note; private notes are refused
    pub fn write_artifact(&self, note: &CompiledNote) -> Result<PathBuf> {
        let path = self.artifact_path(&note.filename);
        if note.is_private {
            return Err(NotesError::write(&path, "refusing to publish a private note"));
        }
        write_json_atomic(&path, note)?;
        Ok(path)
    }

    /// Previously written artifact for `filename`, if present and readable
    pub fn load_artifact(&self, filename: &str) -> Option<CompiledNote> {
        let path = self.artifact_path(filename);
        read_json(&path)
    }

    pub fn write_manifest(&self, manifest: &Manifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        write_json_atomic(&path, manifest)?;
        Ok(path)
    }

    pub fn load_manifest(&self) -> Option<Manifest> {
        read_json(&self.manifest_path())
    }

    /// Write the manifest and every artifact
    pub fn write(&self, manifest: &Manifest, artifacts: &[CompiledNote]) -> Result<()> {
        self.ensure_dir()?;
        for artifact in artifacts {
            self.write_artifact(artifact)?;
        }
        self.write_manifest(manifest)?;
        Ok(())
    }

    /// Source file names that currently have an artifact on disk
    pub fn artifact_filenames(&self) -> Result<Vec<String>> {
        if !self.output_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(ARTIFACT_SUFFIX) && entry.file_type()?.is_file() {
                if let Some(filename) = name.strip_suffix(".json") {
                    names.push(filename.to_string());
                }
            }
        }
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Every readable artifact on disk, newest file name first
    pub fn load_all(&self) -> Result<Vec<CompiledNote>> {
        Ok(self
            .artifact_filenames()?
            .iter()
            .filter_map(|name| self.load_artifact(name))
            .collect())
    }

    /// Delete artifacts whose source file name is not in `keep`.
    ///
    /// Returns the removed file names.
    pub fn prune(&self, keep: &HashSet<String>) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for filename in self.artifact_filenames()? {
            if keep.contains(&filename) {
                continue;
            }
            let path = self.artifact_path(&filename);
            fs::remove_file(&path).map_err(|e| NotesError::write(&path, e))?;
            debug!(filename = %filename, "Pruned stale artifact");
            removed.push(filename);
        }
        Ok(removed)
    }
}

pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, json).map_err(|e| NotesError::write(&temp, e))?;
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(NotesError::write(path, e));
    }
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable artifact");
            None
        }
    }
}
