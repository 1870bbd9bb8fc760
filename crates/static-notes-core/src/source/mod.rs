//! Content fetchers: list notes and read their raw text
//!
//! Two backings share one trait: a local directory and the GitHub
//! Contents API.

pub mod github;
mod local;

use std::sync::Arc;

use crate::config::{Config, SourceBackend};
use crate::error::Result;
use crate::http::{HttpClient, UreqClient};
use crate::note::NoteSourceRecord;

pub use github::{GithubClient, GithubSource};
pub use local::LocalSource;

/// A backing store of Markdown notes
pub trait ContentSource {
    /// All notes, newest first
    fn list_notes(&self) -> Result<Vec<NoteSourceRecord>>;

    /// Raw text of one note
    fn note_body(&self, record: &NoteSourceRecord) -> Result<String>;

    /// Short description for logs and CLI output
    fn describe(&self) -> String;
}

/// Build the configured source
pub fn open(config: &Config) -> Result<Box<dyn ContentSource>> {
    match config.source_backend()? {
        SourceBackend::Local(dir) => Ok(Box::new(LocalSource::new(dir))),
        SourceBackend::Github(settings) => {
            let http: Arc<dyn HttpClient> = Arc::new(UreqClient::new(config.http_timeout_seconds));
            Ok(Box::new(GithubSource::new(GithubClient::new(settings, http))))
        }
    }
}
