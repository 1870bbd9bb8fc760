//! Build and runtime configuration
//!
//! Resolved once at startup, lowest to highest precedence:
//! built-in defaults, `static-notes.toml` in the project root, environment
//! variables. Each environment value accepts several names; the first one
//! present and non-empty wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::DEFAULT_HTTP_TIMEOUT_SECONDS;

/// Optional project config file name
pub const CONFIG_FILE: &str = "static-notes.toml";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_NOTES_PATH: &str = "notes";
pub const DEFAULT_OUTPUT_DIR: &str = "build/static-notes";
pub const DEFAULT_PUBLIC_DIR: &str = "public/static-notes";
pub const DEFAULT_STATE_DIR: &str = ".static-notes";

pub const TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_ACCESS_TOKEN"];
pub const OWNER_VARS: &[&str] = &["GITHUB_OWNER", "GITHUB_REPO_OWNER", "NOTES_REPO_OWNER"];
pub const REPO_VARS: &[&str] = &["GITHUB_REPO", "GITHUB_REPO_NAME", "NOTES_REPO"];
pub const BRANCH_VARS: &[&str] = &["GITHUB_BRANCH", "NOTES_BRANCH"];
pub const NOTES_PATH_VARS: &[&str] = &["GITHUB_NOTES_PATH", "NOTES_PATH"];
pub const LOCAL_DIR_VARS: &[&str] = &["STATIC_NOTES_LOCAL_DIR", "NOTES_DIR"];
pub const OUTPUT_DIR_VARS: &[&str] = &["STATIC_NOTES_OUTPUT_DIR"];
pub const PUBLIC_DIR_VARS: &[&str] = &["STATIC_NOTES_PUBLIC_DIR"];
pub const PASSWORD_VARS: &[&str] = &["ADMIN_PASSWORD", "STATIC_NOTES_ADMIN_PASSWORD"];
pub const API_URL_VARS: &[&str] = &["GITHUB_API_URL"];
pub const TIMEOUT_VARS: &[&str] = &["STATIC_NOTES_HTTP_TIMEOUT"];

/// First alias that is set to a non-empty value
pub fn first_present<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// `static-notes.toml` layout; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub github: GithubFileConfig,
    #[serde(default)]
    pub paths: PathsFileConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubFileConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub notes_path: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsFileConfig {
    pub local_notes_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Load the config file, or defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Coordinates of the notes repository on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSettings {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub notes_path: String,
    pub api_url: String,
}

/// Which backing store notes are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBackend {
    Local(PathBuf),
    Github(GithubSettings),
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: String,
    pub notes_path: String,
    pub api_url: String,
    pub local_notes_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub public_dir: PathBuf,
    pub state_dir: PathBuf,
    pub admin_password: Option<String>,
    pub http_timeout_seconds: u64,
}

impl Config {
    /// Resolve from `root/static-notes.toml` (or `config_path`) and the process environment
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CONFIG_FILE));
        let file = FileConfig::load(&path)?;
        Ok(Self::resolve(root, file, |name| std::env::var(name).ok()))
    }

    /// Resolve with an explicit variable lookup
    pub fn resolve<F>(root: &Path, file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |names: &[&str]| first_present(&lookup, names);
        let rooted = |p: PathBuf| if p.is_absolute() { p } else { root.join(p) };

        let timeout = env(TIMEOUT_VARS)
            .and_then(|v| v.parse::<u64>().ok())
            .or(file.http_timeout_seconds)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS)
            .clamp(5, 300);

        Config {
            token: env(TOKEN_VARS),
            owner: env(OWNER_VARS).or(file.github.owner),
            repo: env(REPO_VARS).or(file.github.repo),
            branch: env(BRANCH_VARS)
                .or(file.github.branch)
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            notes_path: env(NOTES_PATH_VARS)
                .or(file.github.notes_path)
                .unwrap_or_else(|| DEFAULT_NOTES_PATH.to_string()),
            api_url: env(API_URL_VARS)
                .or(file.github.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            local_notes_dir: env(LOCAL_DIR_VARS)
                .map(PathBuf::from)
                .or(file.paths.local_notes_dir)
                .map(rooted),
            output_dir: rooted(
                env(OUTPUT_DIR_VARS)
                    .map(PathBuf::from)
                    .or(file.paths.output_dir)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            ),
            public_dir: rooted(
                env(PUBLIC_DIR_VARS)
                    .map(PathBuf::from)
                    .or(file.paths.public_dir)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            ),
            state_dir: rooted(
                file.paths
                    .state_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR)),
            ),
            admin_password: env(PASSWORD_VARS),
            http_timeout_seconds: timeout,
        }
    }

    /// Pick the notes backend; a local directory wins over GitHub.
    pub fn source_backend(&self) -> Result<SourceBackend> {
        if let Some(dir) = &self.local_notes_dir {
            return Ok(SourceBackend::Local(dir.clone()));
        }
        Ok(SourceBackend::Github(self.github()?))
    }

    /// GitHub coordinates, or a configuration error naming what is missing
    pub fn github(&self) -> Result<GithubSettings> {
        let missing: Vec<&str> = [
            (self.token.is_none(), TOKEN_VARS[0]),
            (self.owner.is_none(), OWNER_VARS[0]),
            (self.repo.is_none(), REPO_VARS[0]),
        ]
        .into_iter()
        .filter_map(|(absent, name)| absent.then_some(name))
        .collect();

        match (&self.token, &self.owner, &self.repo) {
            (Some(token), Some(owner), Some(repo)) => Ok(GithubSettings {
                token: token.clone(),
                owner: owner.clone(),
                repo: repo.clone(),
                branch: self.branch.clone(),
                notes_path: self.notes_path.clone(),
                api_url: self.api_url.clone(),
            }),
            _ => crate::bail_config!(format!(
                "no local notes directory set and GitHub settings incomplete (missing {})",
                missing.join(", ")
            )),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }

    pub fn pending_path(&self) -> PathBuf {
        self.state_dir.join("pending.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_first_present_alias_wins() {
        let env = lookup(&[("GH_TOKEN", "second"), ("GITHUB_ACCESS_TOKEN", "third")]);
        assert_eq!(first_present(&env, TOKEN_VARS).as_deref(), Some("second"));

        let env = lookup(&[("GITHUB_TOKEN", "  "), ("GH_TOKEN", "second")]);
        assert_eq!(first_present(&env, TOKEN_VARS).as_deref(), Some("second"));
    }

    #[test]
    fn test_defaults() {
        let root = Path::new("/srv/site");
        let config = Config::resolve(root, FileConfig::default(), lookup(&[]));
        assert_eq!(config.branch, DEFAULT_BRANCH);
        assert_eq!(config.notes_path, DEFAULT_NOTES_PATH);
        assert_eq!(config.output_dir, root.join(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.public_dir, root.join(DEFAULT_PUBLIC_DIR));
        assert_eq!(config.http_timeout_seconds, DEFAULT_HTTP_TIMEOUT_SECONDS);
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let env = lookup(&[("GITHUB_OWNER", "octo")]);
        let config = Config::resolve(Path::new("."), FileConfig::default(), env);
        let err = config.source_backend().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("GITHUB_TOKEN"));
        assert!(message.contains("GITHUB_REPO"));
        assert!(!message.contains("GITHUB_OWNER"));
    }

    #[test]
    fn test_local_dir_wins_over_github() {
        let env = lookup(&[
            ("NOTES_DIR", "content/notes"),
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_OWNER", "o"),
            ("GITHUB_REPO", "r"),
        ]);
        let config = Config::resolve(Path::new("/p"), FileConfig::default(), env);
        assert_eq!(
            config.source_backend().unwrap(),
            SourceBackend::Local(PathBuf::from("/p/content/notes"))
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "http_timeout_seconds = 1000\n[github]\nowner = \"from-file\"\nrepo = \"notes\"\nbranch = \"pages\"\n",
        )
        .unwrap();
        let file = FileConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        let env = lookup(&[("NOTES_REPO_OWNER", "from-env"), ("GITHUB_TOKEN", "t")]);
        let config = Config::resolve(dir.path(), file, env);

        assert_eq!(config.owner.as_deref(), Some("from-env"));
        assert_eq!(config.branch, "pages");
        assert_eq!(config.http_timeout_seconds, 300);

        let github = config.github().unwrap();
        assert_eq!(github.repo, "notes");
        assert_eq!(github.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_unknown_file_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[github]\nowner = \"x\"\ntypo = 1\n").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }
}
