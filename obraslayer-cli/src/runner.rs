//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and cache creation
//! so command handlers only deal with their own output.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use obraslayer::config::ConfigFile;
use obraslayer::loader::{AggregateSnapshot, AnySource, ResourceCache, ResourceSource};
use obraslayer::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    cache: ResourceCache<AnySource>,
}

impl CliRunner {
    /// Loads config, initializes logging and builds the resource cache.
    ///
    /// `base` overrides `[sources] base`; `verbose` echoes logs to stderr.
    pub fn new(base: Option<String>, verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let cache = build_cache(&config, base.as_deref())?;
        info!("ObrasLayer v{}", obraslayer::VERSION);
        info!(source = %cache.source().describe(), "Resource cache ready");

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            cache,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn cache(&self) -> &ResourceCache<AnySource> {
        &self.cache
    }

    /// Loads `keys`, or the configured keys when empty.
    ///
    /// Fails only when nothing at all could be loaded.
    pub async fn load(&self, keys: &[String]) -> Result<Arc<AggregateSnapshot>, CliError> {
        let keys = if keys.is_empty() {
            self.config.sources.keys.as_slice()
        } else {
            keys
        };

        let snapshot = self.cache.load_all(keys).await;
        if snapshot.resources.is_empty() && !snapshot.errors.is_empty() {
            let errors = snapshot
                .errors
                .iter()
                .map(|(key, e)| (key.clone(), e.clone()))
                .collect();
            return Err(CliError::NothingLoaded(errors));
        }

        for (key, error) in &snapshot.errors {
            eprintln!("warning: {} not loaded: {}", key, error);
        }
        Ok(snapshot)
    }
}

/// Builds the cache from config, choosing HTTP or file access from the base.
pub fn build_cache(config: &ConfigFile, base: Option<&str>) -> Result<ResourceCache<AnySource>, CliError> {
    let base = base.unwrap_or(&config.sources.base);
    let loader = config.loader.to_loader_config();
    let source = AnySource::from_base(base, Duration::from_secs(config.loader.timeout))?;
    Ok(ResourceCache::with_config(source, loader))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cache_uses_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::default();
        let base = dir.path().to_string_lossy().to_string();

        let cache = build_cache(&config, Some(&base)).unwrap();
        assert!(matches!(cache.source(), AnySource::File(_)));
        assert_eq!(cache.source().describe(), base);
    }

    #[test]
    fn test_build_cache_http_base() {
        let mut config = ConfigFile::default();
        config.sources.base = "https://datos.example.org/obras".to_string();
        config.loader.max_entries = Some(2);

        let cache = build_cache(&config, None).unwrap();
        assert!(matches!(cache.source(), AnySource::Http(_)));
        assert_eq!(cache.config().max_entries(), Some(2));
    }
}
