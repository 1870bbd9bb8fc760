//! One build run: list, compile, prune, index, write

use std::collections::HashSet;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::artifacts::ArtifactWriter;
use crate::compiler::{CompileOutcome, IncrementalCompiler, SkipReason};
use crate::error::Result;
use crate::index::{IndexBuilder, Manifest};
use crate::note::CompiledNote;
use crate::source::ContentSource;
use crate::trace_time;

/// Per-note result of a build
#[derive(Debug, Clone)]
pub struct NoteResult {
    pub filename: String,
    pub outcome: CompileOutcome,
}

/// Everything a build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub manifest: Manifest,
    pub results: Vec<NoteResult>,
    /// Artifacts deleted because their note is gone or became private
    pub pruned: Vec<String>,
}

impl BuildReport {
    pub fn compiled_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_compiled()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results.len() - self.compiled_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| match r.outcome.skip_reason() {
            Some(SkipReason::Failed(reason)) => Some((r.filename.as_str(), reason.as_str())),
            _ => None,
        })
    }
}

pub struct BuildPipeline<'a> {
    source: &'a dyn ContentSource,
    writer: &'a ArtifactWriter,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(source: &'a dyn ContentSource, writer: &'a ArtifactWriter) -> Self {
        Self { source, writer }
    }

    /// Run a full build.
    ///
    /// Listing and manifest-write failures abort the build; anything that
    /// goes wrong for a single note is recorded in the report instead.
    #[tracing::instrument(skip_all, fields(source = %self.source.describe()))]
    pub fn run(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let started_at = Utc::now();
        let compiled_at = started_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        self.writer.ensure_dir()?;
        let records = self.source.list_notes()?;
        trace_time!(start, "list_notes", notes = records.len());
        info!(notes = records.len(), "Listed source notes");

        let compiler = IncrementalCompiler::new(self.source, self.writer, compiled_at);
        let mut results = Vec::with_capacity(records.len());
        let mut public: Vec<CompiledNote> = Vec::new();

        for record in &records {
            let outcome = compiler.compile(record);
            match (&outcome, outcome.artifact()) {
                (_, Some(artifact)) => public.push(artifact.clone()),
                (CompileOutcome::Skipped(SkipReason::Failed(_)), None) => {
                    // Keep serving the last good version of a note we could not read
                    if let Some(previous) = self.writer.load_artifact(&record.name) {
                        warn!(filename = %record.name, "Keeping previous artifact after failure");
                        public.push(previous);
                    }
                }
                _ => {}
            }
            results.push(NoteResult {
                filename: record.name.clone(),
                outcome,
            });
        }

        let keep: HashSet<String> = public.iter().map(|a| a.filename.clone()).collect();
        let pruned = self.writer.prune(&keep)?;
        if !pruned.is_empty() {
            info!(count = pruned.len(), "Pruned stale artifacts");
        }

        let compiled = results.iter().filter(|r| r.outcome.is_compiled()).count();
        let manifest = IndexBuilder::new(started_at)
            .total_notes(records.len())
            .stats(compiled, records.len() - compiled, start.elapsed())
            .build(&public);

        let path = self.writer.write_manifest(&manifest)?;
        info!(
            path = %path.display(),
            public = manifest.public_notes,
            compiled,
            skipped = records.len() - compiled,
            "Wrote manifest"
        );

        Ok(BuildReport {
            manifest,
            results,
            pruned,
        })
    }
}
