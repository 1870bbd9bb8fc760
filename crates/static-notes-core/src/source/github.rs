//! GitHub Contents API client and note source
//!
//! Reads go through the paginated directory listing plus the raw
//! `download_url` of each file. Writes (create, update, delete) use the
//! same endpoint with base64-encoded content and the file's current sha as
//! the version token.

use std::collections::HashSet;
use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ContentSource;
use crate::config::GithubSettings;
use crate::error::{NotesError, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::note::{sort_records, Locator, NoteSourceRecord};

/// Entries requested per listing page
pub const PER_PAGE: usize = 100;

/// Upper bound on listing pages
const MAX_PAGES: usize = 50;

const API_VERSION: &str = "2022-11-28";

/// One entry of a Contents API directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    pub download_url: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// Result of a create, update or delete call
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommit {
    /// Absent for deletes
    pub content: Option<ContentEntry>,
    pub commit: CommitRef,
}

#[derive(Serialize)]
struct PutFileBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteFileBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

/// Thin client over the Contents API of one repository
pub struct GithubClient {
    settings: GithubSettings,
    http: Arc<dyn HttpClient>,
    user_agent: String,
}

impl GithubClient {
    pub fn new(settings: GithubSettings, http: Arc<dyn HttpClient>) -> Self {
        let user_agent = format!(
            "static-notes/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        Self {
            settings,
            http,
            user_agent,
        }
    }

    pub fn settings(&self) -> &GithubSettings {
        &self.settings
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("User-Agent", self.user_agent.as_str())
            .header("Authorization", format!("token {}", self.settings.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = self.authorized(request);
        debug!(url = %request.url, method = ?request.method, "github_request");
        self.http.send(&request)
    }

    /// `.../repos/{owner}/{repo}/contents/{path}`
    pub fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.settings.api_url,
            self.settings.owner,
            self.settings.repo,
            path.trim_matches('/')
        )
    }

    /// All entries of a repository directory.
    ///
    /// Pages are followed until one comes back short or adds no new path;
    /// the API may ignore paging and return the whole directory every time.
    pub fn list_directory(&self, path: &str) -> Result<Vec<ContentEntry>> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for page in 1..=MAX_PAGES {
            let url = format!(
                "{}?ref={}&per_page={}&page={}",
                self.contents_url(path),
                self.settings.branch,
                PER_PAGE,
                page
            );
            let response = self.send(HttpRequest::get(&url))?.error_for_status(&url)?;
            let batch: Vec<ContentEntry> = serde_json::from_str(&response.body)
                .map_err(|e| NotesError::fetch(&url, format!("not a directory listing: {}", e)))?;

            let short = batch.len() < PER_PAGE;
            let before = entries.len();
            entries.extend(batch.into_iter().filter(|e| seen.insert(e.path.clone())));
            if short || entries.len() == before {
                return Ok(entries);
            }
        }

        warn!(path, pages = MAX_PAGES, "Directory listing truncated");
        Ok(entries)
    }

    /// Raw UTF-8 text behind a download URL
    pub fn download(&self, url: &str) -> Result<String> {
        let response = self.send(HttpRequest::get(url))?.error_for_status(url)?;
        Ok(response.body)
    }

    /// Current sha of a file, `None` when it does not exist
    pub fn file_sha(&self, path: &str) -> Result<Option<String>> {
        let url = format!("{}?ref={}", self.contents_url(path), self.settings.branch);
        let response = self.send(HttpRequest::get(&url))?;
        if response.status == 404 {
            return Ok(None);
        }
        let response = response.error_for_status(&url)?;
        let entry: ContentEntry = serde_json::from_str(&response.body)?;
        Ok(Some(entry.sha))
    }

    /// Create a file, or update it when `sha` names the version being replaced
    pub fn put_file(
        &self,
        path: &str,
        content: &str,
        sha: Option<&str>,
        message: &str,
    ) -> Result<FileCommit> {
        let url = self.contents_url(path);
        let body = serde_json::to_string(&PutFileBody {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content.as_bytes()),
            branch: &self.settings.branch,
            sha,
        })?;
        let response = self
            .send(HttpRequest::put(&url, body).header("Content-Type", "application/json"))?
            .error_for_status(&url)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn create_file(&self, path: &str, content: &str, message: &str) -> Result<FileCommit> {
        self.put_file(path, content, None, message)
    }

    pub fn update_file(
        &self,
        path: &str,
        content: &str,
        sha: &str,
        message: &str,
    ) -> Result<FileCommit> {
        self.put_file(path, content, Some(sha), message)
    }

    pub fn delete_file(&self, path: &str, sha: &str, message: &str) -> Result<FileCommit> {
        let url = self.contents_url(path);
        let body = serde_json::to_string(&DeleteFileBody {
            message,
            sha,
            branch: &self.settings.branch,
        })?;
        let response = self
            .send(HttpRequest::delete(&url, body).header("Content-Type", "application/json"))?
            .error_for_status(&url)?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Notes read from the configured folder of a GitHub repository
pub struct GithubSource {
    client: GithubClient,
}

impl GithubSource {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

impl ContentSource for GithubSource {
    #[tracing::instrument(skip(self), fields(repo = %self.client.settings.repo))]
    fn list_notes(&self) -> Result<Vec<NoteSourceRecord>> {
        let entries = self.client.list_directory(&self.client.settings.notes_path)?;

        let mut records: Vec<NoteSourceRecord> = entries
            .into_iter()
            .filter(|e| e.entry_type == "file" && e.name.ends_with(".md"))
            .filter_map(|e| match e.download_url {
                Some(url) => Some(NoteSourceRecord {
                    name: e.name,
                    path: e.path,
                    content_hash: e.sha,
                    size_bytes: e.size,
                    locator: Locator::Remote(url),
                }),
                None => {
                    warn!(path = %e.path, "Listing entry has no download_url");
                    None
                }
            })
            .collect();

        sort_records(&mut records);
        Ok(records)
    }

    fn note_body(&self, record: &NoteSourceRecord) -> Result<String> {
        match &record.locator {
            Locator::Remote(url) => self.client.download(url),
            Locator::Local(path) => Err(NotesError::fetch(
                path.display(),
                "local path given to GitHub source",
            )),
        }
    }

    fn describe(&self) -> String {
        let s = &self.client.settings;
        format!("github {}/{}@{}:{}", s.owner, s.repo, s.branch, s.notes_path)
    }
}
