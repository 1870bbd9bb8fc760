use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::warn;
use walkdir::WalkDir;

use super::ContentSource;
use crate::error::{NotesError, Result};
use crate::note::{sort_records, Locator, NoteSourceRecord};

/// Notes stored as `*.md` files directly inside one directory
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Hex SHA-256 of raw note bytes
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl ContentSource for LocalSource {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn list_notes(&self) -> Result<Vec<NoteSourceRecord>> {
        if !self.dir.is_dir() {
            return Err(NotesError::fetch(
                self.dir.display(),
                "notes directory does not exist",
            ));
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type().is_file() || !name.ends_with(".md") {
                continue;
            }

            let bytes = fs::read(path).map_err(|e| NotesError::fetch(path.display(), e))?;
            records.push(NoteSourceRecord {
                path: path
                    .strip_prefix(&self.dir)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .to_string(),
                name,
                content_hash: content_hash(&bytes),
                size_bytes: bytes.len() as u64,
                locator: Locator::Local(path.to_path_buf()),
            });
        }

        sort_records(&mut records);
        Ok(records)
    }

    fn note_body(&self, record: &NoteSourceRecord) -> Result<String> {
        let path = match &record.locator {
            Locator::Local(path) => path.clone(),
            Locator::Remote(_) => self.dir.join(&record.path),
        };
        fs::read_to_string(&path).map_err(|e| NotesError::fetch(path.display(), e))
    }

    fn describe(&self) -> String {
        format!("local directory {}", self.dir.display())
    }
}
