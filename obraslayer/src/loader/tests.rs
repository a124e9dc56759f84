use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::source::tests::MockSource;
use super::*;

const BODY: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature",
     "geometry": {"type": "Point", "coordinates": [-76.52, 3.41]},
     "properties": {"upid": "UNP-1", "nickname": "Centro Cultural", "estado": "En ejecución"}}
]}"#;

fn counter() -> (Arc<AtomicUsize>, impl Fn(&AggregateSnapshot) + Send + Sync + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    (calls, move |_: &AggregateSnapshot| {
        seen.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test]
async fn test_concurrent_loads_fetch_once() {
    let source = MockSource::new().with_delay(Duration::from_millis(50));
    source.respond("x.json", BODY);
    let cache = ResourceCache::new(source.clone());

    let results = join_all((0..5).map(|_| cache.load("x.json"))).await;

    assert_eq!(source.fetch_count(), 1);
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
    }

    let again = cache.load("x.json").await.unwrap();
    assert!(Arc::ptr_eq(first, &again));
    assert_eq!(source.fetch_count(), 1);

    let stats = cache.stats();
    assert_eq!(stats.total_requests, 6);
    assert_eq!(stats.coalesced_requests, 4);
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.cached_keys, ["x.json"]);
    assert!(stats.pending_keys.is_empty());
}

#[tokio::test]
async fn test_failure_reaches_every_waiter_then_retries() {
    let source = MockSource::new().with_delay(Duration::from_millis(20));
    source.fail("x.json", SourceError::Http("HTTP 503".to_string()));
    let cache = ResourceCache::new(source.clone());

    let results = join_all((0..3).map(|_| cache.load("x.json"))).await;
    for result in &results {
        assert_eq!(
            result.as_ref().unwrap_err(),
            &LoadError::Network(SourceError::Http("HTTP 503".to_string()))
        );
    }
    assert_eq!(source.fetch_count(), 1);

    let stats = cache.stats();
    assert_eq!(stats.failed_keys, ["x.json"]);
    assert_eq!(stats.failures, 1);
    assert!(stats.last_error.unwrap().starts_with("x.json:"));

    source.respond("x.json", BODY);
    assert!(cache.load("x.json").await.is_ok());
    assert_eq!(source.fetch_count(), 2);
}

/// Panics on the first fetch, serves `BODY` afterwards.
struct PanicOnceSource {
    fetches: Arc<AtomicUsize>,
}

impl ResourceSource for PanicOnceSource {
    async fn fetch(&self, _key: &str) -> Result<Vec<u8>, SourceError> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        if attempt == 0 {
            panic!("source blew up");
        }
        Ok(BODY.as_bytes().to_vec())
    }

    fn describe(&self) -> String {
        "panic-once".to_string()
    }
}

#[tokio::test]
async fn test_panicking_fetch_fails_waiters_and_allows_retry() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let cache = ResourceCache::new(PanicOnceSource {
        fetches: Arc::clone(&fetches),
    });

    let results = join_all((0..3).map(|_| cache.load("x.json"))).await;
    for result in &results {
        assert!(matches!(result, Err(LoadError::Internal(_))));
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    let stats = cache.stats();
    assert_eq!(stats.failed_keys, ["x.json"]);
    assert!(stats.pending_keys.is_empty());

    assert!(cache.load("x.json").await.is_ok());
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_schema_error() {
    let source = MockSource::new();
    source.respond("x.json", r#"{"type": "Feature"}"#);
    let cache = ResourceCache::new(source);

    let err = cache.load("x.json").await.unwrap_err();
    assert!(matches!(err, LoadError::Schema { .. }));
    assert!(!err.is_transient());
}

#[tokio::test(start_paused = true)]
async fn test_fetch_timeout() {
    let source = MockSource::new().with_delay(Duration::from_secs(60));
    source.respond("x.json", BODY);
    let config = LoaderConfig::new().with_timeout(Duration::from_secs(1));
    let cache = ResourceCache::with_config(source, config);

    let err = cache.load("x.json").await.unwrap_err();
    assert_eq!(err, LoadError::Timeout(Duration::from_secs(1)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_load_all_partial_success() {
    let source = MockSource::new();
    source.respond("equipamientos.geojson", BODY);
    let cache = ResourceCache::new(source);

    let snapshot = cache
        .load_all(&["equipamientos.geojson", "infraestructura_vial.geojson"])
        .await;

    assert_eq!(snapshot.resources.len(), 1);
    assert_eq!(snapshot.unit_count(), 1);
    assert!(matches!(
        snapshot.errors.get("infraestructura_vial.geojson"),
        Some(LoadError::Network(SourceError::NotFound(_)))
    ));
    assert_eq!(snapshot.units().next().unwrap().id, "UNP-1");
}

#[tokio::test]
async fn test_listeners_receive_snapshots() {
    let source = MockSource::new();
    source.respond("a.json", BODY);
    let cache = ResourceCache::new(source);

    let (early_calls, early) = counter();
    cache.subscribe(early);
    assert_eq!(early_calls.load(Ordering::SeqCst), 0);

    cache.load_all(&["a.json"]).await;
    assert_eq!(early_calls.load(Ordering::SeqCst), 1);

    // joins after the aggregate resolved
    let (late_calls, late) = counter();
    let late_id = cache.subscribe(late);
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);

    assert!(cache.unsubscribe(late_id));
    cache.load_all(&["a.json"]).await;
    assert_eq!(early_calls.load(Ordering::SeqCst), 2);
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalidate_refetches_and_republishes() {
    let source = MockSource::new();
    source.respond("a.json", BODY);
    source.respond("b.json", BODY);
    let cache = ResourceCache::new(source.clone());
    cache.load_all(&["a.json", "b.json"]).await;

    let (calls, listener) = counter();
    cache.subscribe(listener);
    assert!(cache.invalidate("a.json"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let snapshot = cache.snapshot().unwrap();
    assert!(!snapshot.resources.contains_key("a.json"));
    assert!(snapshot.resources.contains_key("b.json"));
    assert!(cache.get("a.json").is_none());

    cache.load("a.json").await.unwrap();
    assert_eq!(source.fetch_count(), 3);
}

#[tokio::test]
async fn test_clear_cache_resets_everything() {
    let source = MockSource::new();
    source.respond("a.json", BODY);
    let cache = ResourceCache::new(source.clone());
    let (calls, listener) = counter();
    cache.subscribe(listener);
    cache.load_all(&["a.json"]).await;

    cache.clear_cache();

    assert!(cache.snapshot().is_none());
    assert_eq!(cache.stats(), LoaderStats::default());
    cache.load_all(&["a.json"]).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_max_entries_evicts_oldest() {
    let source = MockSource::new();
    source.respond("a.json", BODY);
    source.respond("b.json", BODY);
    let config = LoaderConfig::new().with_max_entries(Some(1));
    let cache = ResourceCache::with_config(source, config);

    cache.load("a.json").await.unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    cache.load("b.json").await.unwrap();

    assert_eq!(cache.stats().cached_keys, ["b.json"]);
}

#[tokio::test(start_paused = true)]
async fn test_max_age_expires_on_access() {
    let source = MockSource::new();
    source.respond("a.json", BODY);
    let cache = ResourceCache::new(source.clone());
    cache.configure(None, Some(Duration::from_secs(10)));

    cache.load("a.json").await.unwrap();
    tokio::time::advance(Duration::from_secs(5)).await;
    cache.load("a.json").await.unwrap();
    assert_eq!(source.fetch_count(), 1);

    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(cache.get("a.json").is_none());
    cache.load("a.json").await.unwrap();
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_configure_shrinks_existing_entries() {
    let source = MockSource::new();
    source.respond("a.json", BODY);
    source.respond("b.json", BODY);
    let cache = ResourceCache::new(source);
    cache.load_all(&["a.json", "b.json"]).await;

    cache.configure(Some(0), None);
    assert!(cache.stats().cached_keys.is_empty());
    assert_eq!(cache.config().max_entries(), Some(0));
}
