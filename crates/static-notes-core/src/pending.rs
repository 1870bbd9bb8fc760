//! Notes written through the GitHub API that no build has picked up yet
//!
//! The write path records each published note here so listings show it
//! straight away. Once a build produces an artifact with the same sha, or
//! any newer build of the same file, the pending entry is dropped by
//! [`PendingNotes::reconcile`].

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::artifacts::{read_json, write_json_atomic};
use crate::error::{NotesError, Result};
use crate::index::Manifest;
use crate::note::CompiledNote;

/// Rebuild progress counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub building: u32,
    pub completed: u32,
    pub failed: u32,
}

impl BuildStatus {
    pub fn is_building(&self) -> bool {
        self.building > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNotes {
    notes: BTreeMap<String, CompiledNote>,
    #[serde(default)]
    status: BuildStatus,
}

impl PendingNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing or unreadable file starts empty
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        read_json(path).unwrap_or_else(|| {
            warn!(path = %path.display(), "Discarding unreadable pending notes");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| NotesError::write(parent, e))?;
        }
        write_json_atomic(path, self)
    }

    /// Insert or replace the pending copy of a note
    pub fn upsert(&mut self, note: CompiledNote) {
        debug!(filename = %note.filename, "Pending note recorded");
        self.notes.insert(note.filename.clone(), note);
    }

    pub fn remove(&mut self, filename: &str) -> Option<CompiledNote> {
        self.notes.remove(filename)
    }

    pub fn get(&self, filename: &str) -> Option<&CompiledNote> {
        self.notes.get(filename)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledNote> {
        self.notes.values()
    }

    /// Static notes overlaid with pending ones, newest file name first.
    ///
    /// A pending note replaces the static note with the same file name
    /// unless that static note was compiled at or after it.
    pub fn merge_with_static(&self, static_notes: Vec<CompiledNote>) -> Vec<CompiledNote> {
        let mut merged: BTreeMap<String, CompiledNote> = static_notes
            .into_iter()
            .map(|note| (note.filename.clone(), note))
            .collect();
        for (filename, note) in &self.notes {
            let superseded = merged
                .get(filename)
                .is_some_and(|built| not_older(&built.compiled_at, &note.compiled_at));
            if !superseded {
                merged.insert(filename.clone(), note.clone());
            }
        }
        merged.into_values().rev().collect()
    }

    /// Drop pending notes the manifest already serves.
    ///
    /// An entry goes when its sha was built, or when the manifest lists the
    /// same file from a build that started at or after the pending note.
    /// Returns the file names that were dropped.
    pub fn reconcile(&mut self, manifest: &Manifest) -> Vec<String> {
        let built: HashSet<&str> = manifest.notes.values().map(|n| n.sha.as_str()).collect();
        let caught_up: Vec<String> = self
            .notes
            .iter()
            .filter(|(filename, note)| {
                built.contains(note.sha.as_str())
                    || (manifest.notes.contains_key(filename.as_str())
                        && not_older(&manifest.compiled_at, &note.compiled_at))
            })
            .map(|(filename, _)| filename.clone())
            .collect();
        for filename in &caught_up {
            self.notes.remove(filename);
        }
        caught_up
    }

    pub fn mark_building(&mut self) {
        self.status.building += 1;
    }

    pub fn mark_completed(&mut self) {
        self.status.building = self.status.building.saturating_sub(1);
        self.status.completed += 1;
    }

    pub fn mark_failed(&mut self) {
        self.status.building = self.status.building.saturating_sub(1);
        self.status.failed += 1;
    }

    pub fn status(&self) -> BuildStatus {
        self.status
    }
}

/// `a` is the same instant as `b` or later; unparsable stamps compare as text
fn not_older(a: &str, b: &str) -> bool {
    let parse = |s: &str| DateTime::parse_from_rfc3339(s).map(|t| t.with_timezone(&Utc));
    match (parse(a), parse(b)) {
        (Ok(a), Ok(b)) => a >= b,
        _ => a >= b,
    }
}
