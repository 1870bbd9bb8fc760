//! HTTP reader for the static artifacts
//!
//! Reads `index.json` and `<filename>.json` from a base URL and keeps them
//! in memory. The manifest is cached until [`StaticContentReader::clear_cache`];
//! notes expire after a TTL. Every failure is logged and turned into `None`
//! so callers can treat missing data as "not built yet".

mod base;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::http::{HttpClient, HttpRequest};
use crate::index::{Manifest, INDEX_FILE};
use crate::log_cache_metrics;
use crate::logging::CacheMetrics;
use crate::note::{artifact_file_name, CompiledNote};

pub use base::{origin_port, resolve_base_url, RuntimeEnv, DEV_PORTS, STATIC_ROOT};

/// Lifetime of a cached note
pub const NOTE_TTL: Duration = Duration::from_secs(10 * 60);

/// Most note requests a batch keeps in flight
pub const BATCH_CONCURRENCY: usize = 8;

/// What a cached note's age is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtlAnchor {
    /// When this reader fetched it
    #[default]
    FetchedAt,
    /// The artifact's own `compiledAt`; old artifacts expire immediately
    CompiledAt,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct CachedNote {
    note: CompiledNote,
    anchor: DateTime<Utc>,
}

pub struct StaticContentReader {
    http: Arc<dyn HttpClient>,
    base_url: String,
    ttl: TimeDelta,
    anchor: TtlAnchor,
    clock: Clock,
    manifest: Mutex<Option<Manifest>>,
    notes: Mutex<HashMap<String, CachedNote>>,
    metrics: CacheMetrics,
}

impl StaticContentReader {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ttl: TimeDelta::from_std(NOTE_TTL).unwrap_or(TimeDelta::MAX),
            anchor: TtlAnchor::default(),
            clock: Arc::new(Utc::now),
            manifest: Mutex::new(None),
            notes: Mutex::new(HashMap::new()),
            metrics: CacheMetrics::new(),
        }
    }

    /// Reader for the base URL [`resolve_base_url`] picks for `env`
    pub fn for_runtime(http: Arc<dyn HttpClient>, env: &RuntimeEnv) -> Self {
        Self::new(http, resolve_base_url(env))
    }

    pub fn with_ttl_anchor(mut self, anchor: TtlAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// The manifest, fetched once and kept until the cache is cleared
    pub fn index(&self) -> Option<Manifest> {
        if let Some(manifest) = lock(&self.manifest).as_ref() {
            self.metrics.record_hit();
            return Some(manifest.clone());
        }
        self.metrics.record_miss();

        let manifest: Manifest = self.fetch_json(INDEX_FILE)?;
        *lock(&self.manifest) = Some(manifest.clone());
        Some(manifest)
    }

    /// One note, served from cache while fresh
    pub fn note(&self, filename: &str) -> Option<CompiledNote> {
        if let Some(note) = self.fresh(filename) {
            self.metrics.record_hit();
            return Some(note);
        }
        self.metrics.record_miss();

        let note = self.fetch_note(filename)?;
        self.store(note.clone());
        Some(note)
    }

    /// Several notes; uncached ones are fetched concurrently,
    /// at most [`BATCH_CONCURRENCY`] at a time.
    ///
    /// Notes that fail to load are left out of the result.
    pub fn batch(&self, filenames: &[String]) -> HashMap<String, CompiledNote> {
        let mut found = HashMap::new();
        let mut missing = Vec::new();

        for filename in filenames {
            if found.contains_key(filename) || missing.contains(filename) {
                continue;
            }
            match self.fresh(filename) {
                Some(note) => {
                    self.metrics.record_hit();
                    found.insert(filename.clone(), note);
                }
                None => {
                    self.metrics.record_miss();
                    missing.push(filename.clone());
                }
            }
        }

        let mut fetched: Vec<CompiledNote> = Vec::with_capacity(missing.len());
        for chunk in missing.chunks(BATCH_CONCURRENCY) {
            thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|filename| scope.spawn(move || self.fetch_note(filename)))
                    .collect();
                fetched.extend(
                    handles
                        .into_iter()
                        .filter_map(|handle| handle.join().ok().flatten()),
                );
            });
        }

        for note in fetched {
            found.insert(note.filename.clone(), note.clone());
            self.store(note);
        }

        log_cache_metrics!(self.metrics, "batch");
        found
    }

    /// Drop the manifest and every cached note
    pub fn clear_cache(&self) {
        *lock(&self.manifest) = None;
        lock(&self.notes).clear();
    }

    pub fn clear_one(&self, filename: &str) {
        lock(&self.notes).remove(filename);
    }

    fn fresh(&self, filename: &str) -> Option<CompiledNote> {
        let now = (self.clock)();
        let notes = lock(&self.notes);
        let cached = notes.get(filename)?;
        (now - cached.anchor < self.ttl).then(|| cached.note.clone())
    }

    fn store(&self, note: CompiledNote) {
        let anchor = match self.anchor {
            TtlAnchor::FetchedAt => (self.clock)(),
            TtlAnchor::CompiledAt => DateTime::parse_from_rfc3339(&note.compiled_at)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        };
        lock(&self.notes).insert(note.filename.clone(), CachedNote { note, anchor });
    }

    fn fetch_note(&self, filename: &str) -> Option<CompiledNote> {
        self.fetch_json(&artifact_file_name(filename))
    }

    fn fetch_json<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let url = format!("{}/{}", self.base_url, file);
        let response = match self.http.send(&HttpRequest::get(&url)) {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_failure();
                warn!(url = %url, error = %e, "Static fetch failed");
                return None;
            }
        };
        if !response.is_success() {
            self.metrics.record_failure();
            warn!(url = %url, status = response.status, "Static fetch returned error status");
            return None;
        }
        match serde_json::from_str(&response.body) {
            Ok(value) => Some(value),
            Err(e) => {
                self.metrics.record_failure();
                warn!(url = %url, error = %e, "Static artifact is not valid JSON");
                None
            }
        }
    }
}

/// Lock a cache mutex; a panic in another reader thread does not poison the data
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::FakeHttp;
    use crate::index::IndexBuilder;
    use chrono::TimeZone;
    use crate::http::HttpResponse;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    const BASE: &str = "http://localhost:3000/static-notes";

    fn note(filename: &str, compiled_at: &str) -> CompiledNote {
        CompiledNote {
            id: format!("sha-{}", filename),
            title: filename.to_string(),
            content: "body".to_string(),
            content_preview: "body".to_string(),
            created_date: None,
            updated_date: None,
            is_private: false,
            tags: Vec::new(),
            filename: filename.to_string(),
            compiled_at: compiled_at.to_string(),
            sha: format!("sha-{}", filename),
            path: format!("notes/{}", filename),
        }
    }

    fn serve(http: &FakeHttp, note: &CompiledNote) {
        http.route(
            &format!("{}/{}.json", BASE, note.filename),
            200,
            &serde_json::to_string(note).unwrap(),
        );
    }

    /// Clock controlled by the test, in seconds past a fixed start
    fn clock() -> (Arc<AtomicI64>, impl Fn() -> DateTime<Utc> + Send + Sync + 'static) {
        let offset = Arc::new(AtomicI64::new(0));
        let shared = Arc::clone(&offset);
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        (offset, move || {
            start + TimeDelta::seconds(shared.load(Ordering::SeqCst))
        })
    }

    #[test]
    fn test_index_cached_until_cleared() {
        let http = Arc::new(FakeHttp::new());
        let manifest = IndexBuilder::new(Utc::now()).build(&[note("a.md", "x")]);
        let url = format!("{}/index.json", BASE);
        http.route(&url, 200, &serde_json::to_string(&manifest).unwrap());

        let reader = StaticContentReader::new(http.clone(), BASE);
        assert_eq!(reader.index(), Some(manifest.clone()));
        assert_eq!(reader.index(), Some(manifest));
        assert_eq!(http.request_count(&url), 1);

        reader.clear_cache();
        reader.index();
        assert_eq!(http.request_count(&url), 2);
    }

    #[test]
    fn test_index_failure_is_none() {
        let http = Arc::new(FakeHttp::new());
        http.route(&format!("{}/index.json", BASE), 200, "<html>");
        let reader = StaticContentReader::new(http, BASE);
        assert_eq!(reader.index(), None);
        assert_eq!(reader.metrics().failures(), 1);
    }

    #[test]
    fn test_note_ttl_from_fetch_time() {
        let http = Arc::new(FakeHttp::new());
        let a = note("a.md", "2020-01-01T00:00:00.000Z");
        serve(&http, &a);
        let url = format!("{}/a.md.json", BASE);
        let (offset, now) = clock();

        let reader = StaticContentReader::new(http.clone(), BASE).with_clock(now);
        assert_eq!(reader.note("a.md"), Some(a.clone()));

        offset.store(599, Ordering::SeqCst);
        reader.note("a.md");
        assert_eq!(http.request_count(&url), 1);

        offset.store(601, Ordering::SeqCst);
        reader.note("a.md");
        assert_eq!(http.request_count(&url), 2);
    }

    #[test]
    fn test_note_ttl_from_compile_time() {
        let http = Arc::new(FakeHttp::new());
        let old = note("old.md", "2020-01-01T00:00:00.000Z");
        serve(&http, &old);
        let url = format!("{}/old.md.json", BASE);
        let (_offset, now) = clock();

        let reader = StaticContentReader::new(http.clone(), BASE)
            .with_clock(now)
            .with_ttl_anchor(TtlAnchor::CompiledAt);
        reader.note("old.md");
        reader.note("old.md");
        assert_eq!(http.request_count(&url), 2);
    }

    #[test]
    fn test_clear_one() {
        let http = Arc::new(FakeHttp::new());
        let a = note("a.md", "2024-01-01T00:00:00.000Z");
        serve(&http, &a);
        let reader = StaticContentReader::new(http.clone(), BASE);

        reader.note("a.md");
        reader.clear_one("a.md");
        reader.note("a.md");
        assert_eq!(http.request_count(&format!("{}/a.md.json", BASE)), 2);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let http = Arc::new(FakeHttp::new());
        for name in ["a.md", "b.md", "d.md"] {
            serve(&http, &note(name, "2024-01-01T00:00:00.000Z"));
        }
        let reader = StaticContentReader::new(http.clone(), BASE);
        reader.note("d.md");

        let names: Vec<String> = ["a.md", "b.md", "missing.md", "d.md", "a.md"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = reader.batch(&names);

        let mut keys: Vec<_> = result.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["a.md", "b.md", "d.md"]);
        assert_eq!(http.request_count(&format!("{}/d.md.json", BASE)), 1);
        assert_eq!(http.request_count(&format!("{}/a.md.json", BASE)), 1);
        assert_eq!(reader.metrics().failures(), 1);
    }

    /// Serves every artifact after a short delay, tracking peak concurrency
    struct SlowHttp {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl HttpClient for SlowHttp {
        fn send(&self, request: &HttpRequest) -> crate::error::Result<HttpResponse> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let filename = request
                .url
                .rsplit('/')
                .next()
                .unwrap()
                .trim_end_matches(".json");
            Ok(HttpResponse {
                status: 200,
                body: serde_json::to_string(&note(filename, "2024-01-01T00:00:00.000Z")).unwrap(),
            })
        }
    }

    #[test]
    fn test_batch_bounds_concurrency() {
        let http = Arc::new(SlowHttp {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let reader = StaticContentReader::new(http.clone(), BASE);
        let names: Vec<String> = (0..30).map(|i| format!("{:02}.md", i)).collect();

        let result = reader.batch(&names);

        assert_eq!(result.len(), 30);
        let peak = http.peak.load(Ordering::SeqCst);
        assert!(peak <= BATCH_CONCURRENCY, "peak {}", peak);
    }
}
