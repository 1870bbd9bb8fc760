use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

use super::types::{BuildStats, Manifest, NoteSummary, MANIFEST_VERSION};
use crate::note::CompiledNote;

/// Manifest builder.
///
/// The manifest is always rebuilt from the full set of public artifacts
/// handed in, never merged with a previous manifest.
pub struct IndexBuilder {
    compiled_at: String,
    total_notes: Option<usize>,
    stats: Option<BuildStats>,
}

impl IndexBuilder {
    /// Start a manifest stamped with the build's start time
    pub fn new(started_at: DateTime<Utc>) -> Self {
        IndexBuilder {
            compiled_at: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_notes: None,
            stats: None,
        }
    }

    /// Number of listed source notes, private ones included
    pub fn total_notes(mut self, total: usize) -> Self {
        self.total_notes = Some(total);
        self
    }

    pub fn stats(mut self, compiled: usize, skipped: usize, elapsed: Duration) -> Self {
        self.stats = Some(BuildStats {
            compiled_notes: compiled,
            skipped_notes: skipped,
            build_time: format!("{:.2}s", elapsed.as_secs_f64()),
        });
        self
    }

    #[tracing::instrument(skip_all, fields(artifacts = artifacts.len()))]
    pub fn build(self, artifacts: &[CompiledNote]) -> Manifest {
        let mut notes = BTreeMap::new();
        let mut tags = BTreeSet::new();

        for artifact in artifacts {
            if artifact.is_private {
                warn!(filename = %artifact.filename, "Private artifact left out of manifest");
                continue;
            }
            tags.extend(artifact.tags.iter().cloned());
            notes.insert(artifact.filename.clone(), NoteSummary::from(artifact));
        }

        Manifest {
            version: MANIFEST_VERSION.to_string(),
            compiled_at: self.compiled_at,
            total_notes: self.total_notes.unwrap_or(notes.len()),
            public_notes: notes.len(),
            tags: tags.into_iter().collect(),
            notes,
            last_build_stats: self.stats,
        }
    }
}
