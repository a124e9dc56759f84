//! Loader configuration.

use std::time::Duration;

/// Default fetch timeout in seconds.
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;

/// Configuration for the resource cache.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use obraslayer::loader::LoaderConfig;
///
/// let config = LoaderConfig::default();
/// assert_eq!(config.timeout(), Duration::from_secs(30));
/// assert_eq!(config.max_entries(), None);
///
/// let config = LoaderConfig::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_max_entries(Some(4));
/// assert_eq!(config.max_entries(), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Upper bound on a single fetch
    timeout: Duration,
    /// Maximum number of ready entries kept; unbounded when `None`
    max_entries: Option<usize>,
    /// Ready entries older than this are refetched; no expiry when `None`
    max_age: Option<Duration>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fetch timeout. Default: 30 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound the number of ready entries. The oldest is evicted first.
    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Expire ready entries after `max_age`.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_LOAD_TIMEOUT_SECS),
            max_entries: None,
            max_age: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_LOAD_TIMEOUT_SECS));
        assert_eq!(config.max_entries(), None);
        assert_eq!(config.max_age(), None);
        assert_eq!(config, LoaderConfig::new());
    }

    #[test]
    fn test_builder_leaves_other_fields() {
        let config = LoaderConfig::new().with_max_age(Some(Duration::from_secs(60)));
        assert_eq!(config.max_age(), Some(Duration::from_secs(60)));
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_LOAD_TIMEOUT_SECS));
    }
}
