//! Incremental note compiler
//!
//! Each note is fetched, parsed and compared with the artifact already on
//! disk by content hash. Only new or changed public notes are written.
//! Errors never escape [`IncrementalCompiler::compile`]: a note that cannot
//! be fetched or written is reported as skipped with the failure reason.

use std::fmt;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::artifacts::ArtifactWriter;
use crate::note::{self, CompiledNote, NoteSourceRecord, ParsedNote};
use crate::source::ContentSource;
use crate::trace_time;

/// Why a note produced no new artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `private: true`; never materialized
    Private,
    /// Existing artifact already has this content hash
    Unchanged(Box<CompiledNote>),
    /// Fetch or write failed
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Private => write!(f, "private"),
            SkipReason::Unchanged(_) => write!(f, "unchanged"),
            SkipReason::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Compiled(Box<CompiledNote>),
    Skipped(SkipReason),
}

impl CompileOutcome {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileOutcome::Compiled(_))
    }

    /// The public artifact this note is represented by after the run
    pub fn artifact(&self) -> Option<&CompiledNote> {
        match self {
            CompileOutcome::Compiled(note) => Some(&**note),
            CompileOutcome::Skipped(SkipReason::Unchanged(note)) => Some(&**note),
            CompileOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            CompileOutcome::Skipped(reason) => Some(reason),
            CompileOutcome::Compiled(_) => None,
        }
    }
}

/// Build the artifact for a parsed note
pub fn build_artifact(
    record: &NoteSourceRecord,
    parsed: ParsedNote,
    compiled_at: &str,
) -> CompiledNote {
    let created = parsed
        .frontmatter
        .created_at
        .clone()
        .or_else(|| note::filename_timestamp(&record.name));
    let updated = parsed
        .frontmatter
        .updated_at
        .clone()
        .or_else(|| created.clone());

    CompiledNote {
        id: record.content_hash.clone(),
        title: note::derive_title(&parsed.body, &record.name),
        content: parsed.body,
        content_preview: parsed.body_preview,
        created_date: created,
        updated_date: updated,
        is_private: false,
        tags: parsed.frontmatter.tags,
        filename: record.name.clone(),
        compiled_at: compiled_at.to_string(),
        sha: record.content_hash.clone(),
        path: record.path.clone(),
    }
}

pub struct IncrementalCompiler<'a> {
    source: &'a dyn ContentSource,
    writer: &'a ArtifactWriter,
    compiled_at: String,
}

impl<'a> IncrementalCompiler<'a> {
    /// `compiled_at` stamps every artifact written during this run
    pub fn new(
        source: &'a dyn ContentSource,
        writer: &'a ArtifactWriter,
        compiled_at: impl Into<String>,
    ) -> Self {
        Self {
            source,
            writer,
            compiled_at: compiled_at.into(),
        }
    }

    #[tracing::instrument(skip_all, fields(filename = %record.name))]
    pub fn compile(&self, record: &NoteSourceRecord) -> CompileOutcome {
        let start = Instant::now();

        let raw = match self.source.note_body(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to fetch note");
                return CompileOutcome::Skipped(SkipReason::Failed(e.to_string()));
            }
        };

        let parsed = note::parse(&raw);
        for diagnostic in &parsed.diagnostics {
            debug!(?diagnostic, "frontmatter");
        }

        if parsed.frontmatter.is_private {
            debug!("Skipping private note");
            return CompileOutcome::Skipped(SkipReason::Private);
        }

        let artifact = build_artifact(record, parsed, &self.compiled_at);

        if let Some(existing) = self.writer.load_artifact(&record.name) {
            if existing.id == artifact.id {
                debug!("Unchanged");
                return CompileOutcome::Skipped(SkipReason::Unchanged(Box::new(existing)));
            }
        }

        match self.writer.write_artifact(&artifact) {
            Ok(path) => {
                info!(path = %path.display(), "Compiled note");
                trace_time!(start, "compile_note");
                CompileOutcome::Compiled(Box::new(artifact))
            }
            Err(e) => {
                warn!(error = %e, "Failed to write artifact");
                CompileOutcome::Skipped(SkipReason::Failed(e.to_string()))
            }
        }
    }
}
