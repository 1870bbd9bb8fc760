//! Write path: commit notes straight to the repository
//!
//! A published note is not served until the next build. The returned
//! [`Published::pending`] artifact is what callers record in
//! [`PendingNotes`](crate::pending::PendingNotes) meanwhile.

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::compiler::build_artifact;
use crate::error::{NotesError, Result};
use crate::note::{self, CompiledNote, Locator, NoteSourceRecord};
use crate::source::GithubClient;

#[derive(Debug, Clone)]
pub struct Published {
    pub path: String,
    pub filename: String,
    /// False when an existing file was replaced
    pub created: bool,
    pub commit: String,
    /// Artifact the next build will produce; `None` for private notes
    pub pending: Option<CompiledNote>,
}

pub struct Publisher<'a> {
    client: &'a GithubClient,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Repository path for a note file name under the configured folder
    pub fn default_path(&self, filename: &str) -> String {
        let folder = self.client.settings().notes_path.trim_matches('/');
        if folder.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", folder, filename)
        }
    }

    /// Create or update the note at `path`
    pub fn publish(&self, path: &str, content: &str, message: Option<&str>) -> Result<Published> {
        let filename = note_filename(path)?;
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Publish {}", filename));

        let existing = self.client.file_sha(path)?;
        let commit = self
            .client
            .put_file(path, content, existing.as_deref(), &message)?;
        let entry = commit.content.ok_or_else(|| {
            NotesError::fetch(path, "commit response did not include the file")
        })?;

        info!(path, created = existing.is_none(), "Published note");

        let parsed = note::parse(content);
        let pending = (!parsed.frontmatter.is_private).then(|| {
            let record = NoteSourceRecord {
                name: filename.clone(),
                path: entry.path.clone(),
                content_hash: entry.sha.clone(),
                size_bytes: entry.size,
                locator: Locator::Remote(entry.download_url.clone().unwrap_or_default()),
            };
            let compiled_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            build_artifact(&record, parsed, &compiled_at)
        });

        Ok(Published {
            path: entry.path,
            filename,
            created: existing.is_none(),
            commit: commit.commit.sha,
            pending,
        })
    }

    /// Delete the note at `path`; returns the commit sha
    pub fn unpublish(&self, path: &str, message: Option<&str>) -> Result<String> {
        let filename = note_filename(path)?;
        let Some(sha) = self.client.file_sha(path)? else {
            return Err(NotesError::not_found("note", path));
        };
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Remove {}", filename));

        let commit = self.client.delete_file(path, &sha, &message)?;
        info!(path, "Unpublished note");
        Ok(commit.commit.sha)
    }
}

/// Last path segment, which must be a Markdown file
pub fn note_filename(path: &str) -> Result<String> {
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    if !name.ends_with(".md") || name.len() <= 3 {
        return Err(NotesError::UsageError(format!(
            "not a Markdown note path: {}",
            path
        )));
    }
    Ok(name.to_string())
}
