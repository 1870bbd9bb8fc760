use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the raw body of a note can be downloaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// File on the local filesystem
    Local(PathBuf),
    /// Raw download URL returned by the hosting API
    Remote(String),
}

/// A note as discovered by listing the backing store.
///
/// Immutable per listing; the next listing supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSourceRecord {
    /// File name including the `.md` extension
    pub name: String,
    /// Path relative to the repository (or notes directory) root
    pub path: String,
    /// Content fingerprint (git blob sha remotely, SHA-256 locally)
    pub content_hash: String,
    pub size_bytes: u64,
    pub locator: Locator,
}

/// Metadata carried in a note's frontmatter block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Defaults to public
    pub is_private: bool,
    /// In declaration order; duplicates are kept
    pub tags: Vec<String>,
}

/// The compiled, publicly servable representation of one note.
///
/// Serialized as `<filename>.json` in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledNote {
    /// Equal to the source content hash
    pub id: String,
    pub title: String,
    /// Full body with the frontmatter stripped
    pub content: String,
    pub content_preview: String,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    /// Always false on disk; private notes are never compiled
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub filename: String,
    pub compiled_at: String,
    pub sha: String,
    pub path: String,
}

impl CompiledNote {
    /// Name of the artifact file for this note
    pub fn artifact_name(&self) -> String {
        artifact_file_name(&self.filename)
    }
}

/// `2024-01-01-10-00-00.md` -> `2024-01-01-10-00-00.md.json`
pub fn artifact_file_name(filename: &str) -> String {
    format!("{}.json", filename)
}
