//! Resource sources: where the raw bytes of a dataset come from.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::error::SourceError;

/// Fetches the raw bytes of a resource by key.
///
/// Implementations must be shareable across tasks; the cache spawns one
/// fetch task per key and moves an `Arc` of the source into it.
pub trait ResourceSource: Send + Sync + 'static {
    /// Fetches the resource stored under `key`.
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("obraslayer/", env!("CARGO_PKG_VERSION"));

/// Fetches resources over HTTP from a base URL.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Creates a source resolving keys against `base_url`.
    ///
    /// `request_timeout` bounds each request at the HTTP layer; the cache
    /// applies its own timeout on top.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL for a key.
    pub fn url_for(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

impl ResourceSource for HttpSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, SourceError> {
        let url = self.url_for(key);

        let response = match self.client.get(&url).send().await {
            Ok(resp) => {
                debug!(url = %url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = %url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(SourceError::Http(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url));
        }
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "HTTP error status");
            return Err(SourceError::Http(format!("HTTP {} from {}", status, url)));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = %url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read response body");
                Err(SourceError::Http(format!("Failed to read response: {}", e)))
            }
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads resources from a local directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a key, relative to the root.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

impl ResourceSource for FileSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                trace!(path = %path.display(), bytes = bytes.len(), "Read resource file");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SourceError::NotFound(path.display().to_string()))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read resource file");
                Err(SourceError::Io(format!("{}: {}", path.display(), e)))
            }
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Either source kind, chosen at runtime from a configured base.
#[derive(Clone)]
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl AnySource {
    /// URLs with an `http://` or `https://` scheme use HTTP; anything else
    /// is a directory.
    pub fn from_base(base: &str, request_timeout: Duration) -> Result<Self, SourceError> {
        let lower = base.trim().to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(AnySource::Http(HttpSource::new(base.trim(), request_timeout)?))
        } else {
            Ok(AnySource::File(FileSource::new(base.trim())))
        }
    }
}

impl ResourceSource for AnySource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, SourceError> {
        match self {
            AnySource::Http(source) => source.fetch(key).await,
            AnySource::File(source) => source.fetch(key).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::Http(source) => source.describe(),
            AnySource::File(source) => source.describe(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory source counting fetches, with an optional delay.
    #[derive(Clone, Default)]
    pub struct MockSource {
        pub responses: Arc<parking_lot::Mutex<HashMap<String, Result<Vec<u8>, SourceError>>>>,
        pub fetches: Arc<AtomicUsize>,
        pub delay: Option<Duration>,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn respond(&self, key: &str, body: &str) {
            self.responses
                .lock()
                .insert(key.to_string(), Ok(body.as_bytes().to_vec()));
        }

        pub fn fail(&self, key: &str, error: SourceError) {
            self.responses.lock().insert(key.to_string(), Err(error));
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ResourceSource for MockSource {
        async fn fetch(&self, key: &str) -> Result<Vec<u8>, SourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .get(key)
                .cloned()
                .unwrap_or_else(|| Err(SourceError::NotFound(key.to_string())))
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }

    #[test]
    fn test_http_url_join() {
        let source = HttpSource::new("https://datos.example.org/obras/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.url_for("/equipamientos.geojson"),
            "https://datos.example.org/obras/equipamientos.geojson"
        );
    }

    #[test]
    fn test_any_source_from_base() {
        let timeout = Duration::from_secs(5);
        assert!(matches!(
            AnySource::from_base("HTTPS://datos.example.org", timeout),
            Ok(AnySource::Http(_))
        ));
        assert!(matches!(
            AnySource::from_base("/var/lib/obras", timeout),
            Ok(AnySource::File(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.geojson"), b"{}").unwrap();
        let source = FileSource::new(dir.path());

        assert_eq!(source.fetch("a.geojson").await.unwrap(), b"{}");
        assert!(matches!(
            source.fetch("missing.geojson").await,
            Err(SourceError::NotFound(_))
        ));
    }
}
