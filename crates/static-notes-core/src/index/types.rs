use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::note::CompiledNote;

/// Manifest format version
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Manifest file name inside the output directory
pub const INDEX_FILE: &str = "index.json";

/// `index.json`: one summary per public note plus build statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub compiled_at: String,
    /// Every listed source note, private ones included
    pub total_notes: usize,
    pub public_notes: usize,
    /// Distinct tags across public notes, sorted
    #[serde(default)]
    pub tags: Vec<String>,
    /// Keyed by source file name including `.md`
    pub notes: BTreeMap<String, NoteSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build_stats: Option<BuildStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub content_preview: String,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sha: String,
    pub path: String,
}

impl From<&CompiledNote> for NoteSummary {
    fn from(note: &CompiledNote) -> Self {
        NoteSummary {
            id: note.id.clone(),
            title: note.title.clone(),
            content_preview: note.content_preview.clone(),
            created_date: note.created_date.clone(),
            updated_date: note.updated_date.clone(),
            tags: note.tags.clone(),
            sha: note.sha.clone(),
            path: note.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    pub compiled_notes: usize,
    pub skipped_notes: usize,
    /// Seconds with two decimals, e.g. `"1.23s"`
    pub build_time: String,
}
