//! Blocking HTTP seam shared by the GitHub client and the static reader
//!
//! Non-2xx statuses come back as ordinary [`HttpResponse`]s so callers can
//! surface the status and body; only transport failures are errors.

use std::time::Duration;

use ureq::Agent;

use crate::error::{NotesError, Result};

/// Default timeout for HTTP requests
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into a fetch error carrying status and body
    pub fn error_for_status(self, target: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(NotesError::http_status(target, self.status, &self.body))
        }
    }
}

/// Anything that can execute an [`HttpRequest`]
pub trait HttpClient: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by a ureq agent
pub struct UreqClient {
    agent: Agent,
}

impl UreqClient {
    pub fn new(timeout_seconds: u64) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_seconds)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: Agent::new_with_config(config),
        }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT_SECONDS)
    }
}

impl HttpClient for UreqClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let body = request.body.clone().unwrap_or_default();

        let response = match request.method {
            Method::Get => {
                let mut builder = self.agent.get(url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            Method::Put => {
                let mut builder = self.agent.put(url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(body.as_str())
            }
            Method::Delete => {
                let mut builder = self.agent.delete(url).force_send_body();
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(body.as_str())
            }
        };

        let mut response = response.map_err(|e| NotesError::fetch(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| NotesError::fetch(url, e))?;

        Ok(HttpResponse { status, body })
    }
}
