//! Base URL of the static artifacts for the current runtime

/// Root-relative path the artifacts are served under
pub const STATIC_ROOT: &str = "/static-notes";

/// Ports of known local dev servers
pub const DEV_PORTS: &[u16] = &[3000, 3001, 5173, 8080];

/// Where the reader is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    /// Origin of the current page, e.g. `https://notes.example.com`
    pub origin: String,
    pub development: bool,
}

impl RuntimeEnv {
    pub fn production(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            development: false,
        }
    }

    /// Dev server on localhost at `port`
    pub fn development(port: u16) -> Self {
        Self {
            origin: format!("http://localhost:{}", port),
            development: true,
        }
    }
}

/// Port in an origin such as `http://localhost:3000`
pub fn origin_port(origin: &str) -> Option<u16> {
    let authority = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    let authority = authority.split('/').next().unwrap_or(authority);
    let (_, port) = authority.rsplit_once(':')?;
    port.parse().ok()
}

/// Resolve the artifact base URL.
///
/// In development, a page served from one of [`DEV_PORTS`] reads from the
/// dev server on that port. Everywhere else the fixed [`STATIC_ROOT`] under
/// the page origin is used.
pub fn resolve_base_url(env: &RuntimeEnv) -> String {
    if env.development {
        if let Some(port) = origin_port(&env.origin).filter(|p| DEV_PORTS.contains(p)) {
            return format!("http://localhost:{}{}", port, STATIC_ROOT);
        }
    }
    format!("{}{}", env.origin.trim_end_matches('/'), STATIC_ROOT)
}
