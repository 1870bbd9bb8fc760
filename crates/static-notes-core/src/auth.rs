//! Shared-secret admin session
//!
//! A single configured password gates the write commands. A successful
//! login is persisted as a small JSON session file so later invocations see
//! it; listeners registered with [`AdminAuth::subscribe`] are told about
//! every login and logout in this process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifacts::write_json_atomic;
use crate::error::{NotesError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub is_authenticated: bool,
    pub authenticated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn(AdminSession),
    LoggedOut,
}

type Listener = Box<dyn Fn(&AuthEvent) + Send + Sync>;

pub struct AdminAuth {
    password: Option<String>,
    session_path: PathBuf,
    listeners: Mutex<Vec<Listener>>,
}

impl AdminAuth {
    pub fn new(password: Option<String>, session_path: impl Into<PathBuf>) -> Self {
        Self {
            password,
            session_path: session_path.into(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    pub fn subscribe(&self, listener: impl Fn(&AuthEvent) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Box::new(listener));
    }

    fn notify(&self, event: &AuthEvent) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for listener in listeners.iter() {
            listener(event);
        }
    }

    /// Check `candidate` against the configured password and start a session
    pub fn login(&self, candidate: &str) -> Result<AdminSession> {
        let Some(password) = self.password.as_deref() else {
            return Err(NotesError::configuration(
                "no admin password configured (set ADMIN_PASSWORD)",
            ));
        };
        if candidate != password {
            warn!("Rejected admin login");
            return Err(NotesError::Unauthorized {
                reason: "invalid password".to_string(),
            });
        }

        let session = AdminSession {
            is_authenticated: true,
            authenticated_at: Utc::now(),
        };
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent).map_err(|e| NotesError::write(parent, e))?;
        }
        write_json_atomic(&self.session_path, &session)?;
        info!("Admin session started");

        self.notify(&AuthEvent::LoggedIn(session.clone()));
        Ok(session)
    }

    /// The stored session; a corrupt session file is removed
    pub fn current(&self) -> Option<AdminSession> {
        let content = fs::read_to_string(&self.session_path).ok()?;
        match serde_json::from_str::<AdminSession>(&content) {
            Ok(session) if session.is_authenticated => Some(session),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.session_path.display(), error = %e, "Removing corrupt session");
                let _ = fs::remove_file(&self.session_path);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Fail with `Unauthorized` unless a session exists
    pub fn require(&self) -> Result<AdminSession> {
        self.current().ok_or_else(|| NotesError::Unauthorized {
            reason: "admin login required (run `static-notes login`)".to_string(),
        })
    }

    pub fn logout(&self) -> Result<()> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path)
                .map_err(|e| NotesError::write(&self.session_path, e))?;
        }
        info!("Admin session ended");
        self.notify(&AuthEvent::LoggedOut);
        Ok(())
    }
}
