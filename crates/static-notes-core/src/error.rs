//! Error types and exit codes for static-notes
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (fetch, write, sync, IO)
//! - 2: Usage error (bad flags/args)
//! - 3: Configuration/data error (missing credentials, bad config file)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Configuration or data error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while building, syncing or reading notes
#[derive(Error, Debug)]
pub enum NotesError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    // Configuration/data errors (exit code 3)
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("not authorized: {reason}")]
    Unauthorized { reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("failed to fetch {target}: {reason}")]
    Fetch {
        target: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("failed to write {path:?}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("failed to sync {source_dir:?} -> {target_dir:?}: {reason}")]
    Sync {
        source_dir: PathBuf,
        target_dir: PathBuf,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl NotesError {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        NotesError::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a fetch error without an HTTP status (transport or local read failure)
    pub fn fetch(target: impl std::fmt::Display, error: impl std::fmt::Display) -> Self {
        NotesError::Fetch {
            target: target.to_string(),
            status: None,
            reason: error.to_string(),
        }
    }

    /// Create a fetch error for a non-2xx HTTP response, keeping the body for diagnostics
    pub fn http_status(target: impl std::fmt::Display, status: u16, body: &str) -> Self {
        NotesError::Fetch {
            target: target.to_string(),
            status: Some(status),
            reason: format!("HTTP {}: {}", status, body.trim()),
        }
    }

    /// Create a write error for a filesystem path
    pub fn write(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        NotesError::Write {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Create a sync error
    pub fn sync(
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        error: impl std::fmt::Display,
    ) -> Self {
        NotesError::Sync {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        NotesError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// HTTP status attached to a fetch error, if any
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            NotesError::Fetch { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            NotesError::UsageError(_) => ExitCode::Usage,

            NotesError::Configuration { .. }
            | NotesError::Unauthorized { .. }
            | NotesError::NotFound { .. }
            | NotesError::Toml(_) => ExitCode::Data,

            NotesError::Fetch { .. }
            | NotesError::Write { .. }
            | NotesError::Sync { .. }
            | NotesError::Io(_)
            | NotesError::Json(_)
            | NotesError::Other(_) => ExitCode::Failure,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            NotesError::UsageError(_) => "usage_error",
            NotesError::Configuration { .. } => "configuration_error",
            NotesError::Unauthorized { .. } => "unauthorized",
            NotesError::NotFound { .. } => "not_found",
            NotesError::Fetch { .. } => "fetch_error",
            NotesError::Write { .. } => "write_error",
            NotesError::Sync { .. } => "sync_error",
            NotesError::Io(_) => "io_error",
            NotesError::Json(_) => "json_error",
            NotesError::Toml(_) => "toml_error",
            NotesError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let Some(status) = self.http_status_code() {
            error_obj["status"] = serde_json::json!(status);
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for static-notes operations
pub type Result<T> = std::result::Result<T, NotesError>;
