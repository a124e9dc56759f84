//! Cache statistics

use tracing::info;

/// Point-in-time view of the cache for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Keys with a ready value, sorted
    pub cached_keys: Vec<String>,
    /// Keys with a fetch in flight, sorted
    pub pending_keys: Vec<String>,
    /// Keys whose last fetch failed, sorted
    pub failed_keys: Vec<String>,
    /// Most recent failure, as `key: error`
    pub last_error: Option<String>,
    /// Calls to `load`
    pub total_requests: u64,
    /// Calls that joined an in-flight fetch
    pub coalesced_requests: u64,
    /// Fetches issued to the source
    pub fetches: u64,
    /// Fetches that ended in an error
    pub failures: u64,
}

impl LoaderStats {
    /// Share of requests served by joining an in-flight fetch (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.coalesced_requests as f64 / self.total_requests as f64
        }
    }

    /// Share of requests answered without a fetch (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_requests.saturating_sub(self.fetches) as f64 / self.total_requests as f64
        }
    }

    pub fn log(&self) {
        info!(
            total_requests = self.total_requests,
            coalesced = self.coalesced_requests,
            fetches = self.fetches,
            failures = self.failures,
            cached = self.cached_keys.len(),
            pending = self.pending_keys.len(),
            coalescing_ratio = format!("{:.1}%", self.coalescing_ratio() * 100.0),
            "Resource cache statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratios_empty() {
        let stats = LoaderStats::default();
        assert_eq!(stats.coalescing_ratio(), 0.0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_ratios() {
        let stats = LoaderStats {
            total_requests: 4,
            coalesced_requests: 3,
            fetches: 1,
            ..Default::default()
        };
        assert_eq!(stats.coalescing_ratio(), 0.75);
        assert_eq!(stats.hit_ratio(), 0.75);
    }
}
