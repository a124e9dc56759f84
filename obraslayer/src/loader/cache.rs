//! Deduplicating resource cache.
//!
//! Every key moves through `NotRequested → Pending → Ready | Failed`. The
//! first `load` of a key inserts a `Pending` entry holding a broadcast
//! sender and spawns the fetch; later callers subscribe to that sender
//! instead of fetching again. On completion the entry is replaced first and
//! the outcome broadcast second, so a caller either joins the broadcast or
//! finds the stored state.
//!
//! ```text
//! load("a") ─┐
//! load("a") ─┼──► entries["a"] = Pending(tx) ──► fetch task ──► Ready / Failed
//! load("a") ─┘          │                                           │
//!                       └────────── tx.send(outcome) ◄──────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::config::LoaderConfig;
use super::error::LoadError;
use super::resource::ParsedResource;
use super::snapshot::{AggregateSnapshot, ListenerId, ListenerRegistry};
use super::source::ResourceSource;
use super::stats::LoaderStats;

/// Shared outcome of one fetch.
pub type LoadOutcome = Result<Arc<ParsedResource>, LoadError>;

enum CacheEntry {
    Pending(broadcast::Sender<LoadOutcome>),
    Ready {
        value: Arc<ParsedResource>,
        loaded_at: Instant,
    },
    Failed(LoadError),
}

/// What a `load` call does after inspecting the entry.
enum Lookup {
    Hit(Arc<ParsedResource>),
    Wait(broadcast::Receiver<LoadOutcome>),
    Fetch(broadcast::Sender<LoadOutcome>, broadcast::Receiver<LoadOutcome>),
}

/// Cache of parsed resources keyed by resource path.
///
/// Cloning is cheap and every clone shares the same entries, listeners and
/// statistics.
pub struct ResourceCache<S: ResourceSource> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    source: Arc<S>,
    entries: DashMap<String, CacheEntry>,
    config: RwLock<LoaderConfig>,
    listeners: ListenerRegistry,
    last_error: Mutex<Option<String>>,
    total_requests: AtomicU64,
    coalesced_requests: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

impl<S: ResourceSource> Clone for ResourceCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ResourceSource> ResourceCache<S> {
    /// Creates a cache with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, LoaderConfig::default())
    }

    pub fn with_config(source: S, config: LoaderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: Arc::new(source),
                entries: DashMap::new(),
                config: RwLock::new(config),
                listeners: ListenerRegistry::default(),
                last_error: Mutex::new(None),
                total_requests: AtomicU64::new(0),
                coalesced_requests: AtomicU64::new(0),
                fetches: AtomicU64::new(0),
                failures: AtomicU64::new(0),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn config(&self) -> LoaderConfig {
        *self.inner.config.read()
    }

    /// Loads one resource.
    ///
    /// A ready value is returned without awaiting anything. While a fetch is
    /// in flight every caller waits for that fetch and receives the same
    /// outcome. A failed or expired entry starts a new fetch.
    pub async fn load(&self, key: &str) -> LoadOutcome {
        let inner = &self.inner;
        inner.total_requests.fetch_add(1, Ordering::Relaxed);

        let lookup = match inner.entries.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                let fresh = match occupied.get() {
                    CacheEntry::Ready { value, loaded_at } if !inner.is_expired(*loaded_at) => {
                        Some(Lookup::Hit(Arc::clone(value)))
                    }
                    CacheEntry::Pending(tx) => Some(Lookup::Wait(tx.subscribe())),
                    CacheEntry::Ready { .. } | CacheEntry::Failed(_) => None,
                };
                fresh.unwrap_or_else(|| {
                    let (tx, rx) = broadcast::channel(1);
                    occupied.insert(CacheEntry::Pending(tx.clone()));
                    Lookup::Fetch(tx, rx)
                })
            }
            MapEntry::Vacant(vacant) => {
                let (tx, rx) = broadcast::channel(1);
                vacant.insert(CacheEntry::Pending(tx.clone()));
                Lookup::Fetch(tx, rx)
            }
        };

        let mut rx = match lookup {
            Lookup::Hit(value) => {
                debug!(key, "Cache hit");
                return Ok(value);
            }
            Lookup::Wait(rx) => {
                let coalesced = inner.coalesced_requests.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(key, coalesced, "Joining in-flight fetch");
                rx
            }
            Lookup::Fetch(tx, rx) => {
                debug!(key, source = %inner.source.describe(), "Starting fetch");
                let task_inner = Arc::clone(inner);
                let task_key = key.to_string();
                tokio::spawn(async move { task_inner.complete_fetch(task_key, tx).await });
                rx
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            Err(e) => Err(LoadError::Internal(format!("fetch of '{}' ended without a result: {}", key, e))),
        }
    }

    /// Loads `keys` one after another and publishes the aggregate.
    ///
    /// Failures are recorded per key and never abort the remaining keys.
    pub async fn load_all<K: AsRef<str>>(&self, keys: &[K]) -> Arc<AggregateSnapshot> {
        let mut snapshot = AggregateSnapshot::default();

        for key in keys {
            let key = key.as_ref();
            match self.load(key).await {
                Ok(resource) => {
                    snapshot.resources.insert(key.to_string(), resource);
                }
                Err(e) => {
                    warn!(key, error = %e, "Resource failed to load");
                    snapshot.errors.insert(key.to_string(), e);
                }
            }
        }

        info!(
            requested = keys.len(),
            loaded = snapshot.resources.len(),
            failed = snapshot.errors.len(),
            units = snapshot.unit_count(),
            "Aggregate load complete"
        );

        let snapshot = Arc::new(snapshot);
        self.inner.listeners.publish(Arc::clone(&snapshot));
        snapshot
    }

    /// Registers a listener for aggregate snapshots.
    ///
    /// If a snapshot has already been published the listener is called
    /// with it before this returns.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AggregateSnapshot) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.unsubscribe(id)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Option<Arc<AggregateSnapshot>> {
        self.inner.listeners.current()
    }

    /// Ready value for `key`, without loading.
    pub fn get(&self, key: &str) -> Option<Arc<ParsedResource>> {
        match self.inner.entries.get(key).as_deref() {
            Some(CacheEntry::Ready { value, loaded_at }) if !self.inner.is_expired(*loaded_at) => {
                Some(Arc::clone(value))
            }
            _ => None,
        }
    }

    /// Drops the entry for `key` and republishes the snapshot without it.
    ///
    /// An in-flight fetch for the key still answers its waiters but its
    /// result is not stored.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.inner.entries.remove(key).is_some();
        debug!(key, removed, "Invalidated cache entry");

        if let Some(current) = self.inner.listeners.current() {
            let mut next = (*current).clone();
            next.resources.remove(key);
            next.errors.remove(key);
            self.inner.listeners.publish(Arc::new(next));
        }
        removed
    }

    /// Resets entries, listeners, the published snapshot and statistics.
    pub fn clear_cache(&self) {
        let inner = &self.inner;
        inner.entries.clear();
        inner.listeners.clear();
        *inner.last_error.lock() = None;
        inner.total_requests.store(0, Ordering::Relaxed);
        inner.coalesced_requests.store(0, Ordering::Relaxed);
        inner.fetches.store(0, Ordering::Relaxed);
        inner.failures.store(0, Ordering::Relaxed);
        info!("Resource cache cleared");
    }

    /// Adjusts eviction. Applies at once to entries already stored.
    pub fn configure(&self, max_entries: Option<usize>, max_age: Option<Duration>) {
        {
            let mut config = self.inner.config.write();
            *config = config.with_max_entries(max_entries).with_max_age(max_age);
        }
        debug!(?max_entries, ?max_age, "Cache eviction configured");
        self.inner.evict_overflow();
    }

    pub fn stats(&self) -> LoaderStats {
        let mut stats = LoaderStats {
            last_error: self.inner.last_error.lock().clone(),
            total_requests: self.inner.total_requests.load(Ordering::Relaxed),
            coalesced_requests: self.inner.coalesced_requests.load(Ordering::Relaxed),
            fetches: self.inner.fetches.load(Ordering::Relaxed),
            failures: self.inner.failures.load(Ordering::Relaxed),
            ..Default::default()
        };

        for entry in self.inner.entries.iter() {
            let key = entry.key().clone();
            match entry.value() {
                CacheEntry::Pending(_) => stats.pending_keys.push(key),
                CacheEntry::Ready { .. } => stats.cached_keys.push(key),
                CacheEntry::Failed(_) => stats.failed_keys.push(key),
            }
        }
        stats.cached_keys.sort();
        stats.pending_keys.sort();
        stats.failed_keys.sort();
        stats
    }

    pub fn log_stats(&self) {
        self.stats().log();
    }
}

impl<S: ResourceSource> Inner<S> {
    fn is_expired(&self, loaded_at: Instant) -> bool {
        self.config
            .read()
            .max_age()
            .is_some_and(|max_age| loaded_at.elapsed() >= max_age)
    }

    /// Runs on the spawned task: fetch, parse, store, broadcast.
    ///
    /// If the task unwinds before settling, the guard fails the entry and
    /// answers the waiters so the key can be retried.
    async fn complete_fetch(self: Arc<Self>, key: String, tx: broadcast::Sender<LoadOutcome>) {
        let guard = FetchGuard {
            inner: Arc::clone(&self),
            key: key.clone(),
            tx,
            armed: true,
        };

        self.fetches.fetch_add(1, Ordering::Relaxed);
        let timeout = self.config.read().timeout();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(timeout, self.source.fetch(&key)).await {
            Err(_) => Err(LoadError::Timeout(timeout)),
            Ok(Err(e)) => Err(LoadError::Network(e)),
            Ok(Ok(bytes)) => ParsedResource::parse(&key, &bytes).map(Arc::new),
        };

        if let Ok(value) = &outcome {
            debug!(
                key = %key,
                units = value.units.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetch complete"
            );
        }

        guard.settle(outcome);
    }

    /// Stores the outcome if the entry is still our pending fetch, then
    /// broadcasts it.
    fn settle(&self, key: &str, tx: &broadcast::Sender<LoadOutcome>, outcome: LoadOutcome) {
        let next = match &outcome {
            Ok(value) => CacheEntry::Ready {
                value: Arc::clone(value),
                loaded_at: Instant::now(),
            },
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %e, "Fetch failed");
                *self.last_error.lock() = Some(format!("{}: {}", key, e));
                CacheEntry::Failed(e.clone())
            }
        };

        let stored = match self.entries.get_mut(key) {
            Some(mut entry) => {
                let ours = matches!(&*entry, CacheEntry::Pending(current) if current.same_channel(tx));
                if ours {
                    *entry = next;
                }
                ours
            }
            None => false,
        };
        if !stored {
            debug!(key = %key, "Entry replaced while fetching; result not stored");
        }

        let waiters = tx.receiver_count();
        let _ = tx.send(outcome);
        debug!(key = %key, waiters, "Broadcast fetch outcome");

        if stored {
            self.evict_overflow();
        }
    }

    /// Evicts the oldest ready entries beyond `max_entries`.
    fn evict_overflow(&self) {
        let Some(max_entries) = self.config.read().max_entries() else {
            return;
        };

        let mut ready: Vec<(String, Instant)> = self
            .entries
            .iter()
            .filter_map(|entry| match entry.value() {
                CacheEntry::Ready { loaded_at, .. } => Some((entry.key().clone(), *loaded_at)),
                _ => None,
            })
            .collect();
        if ready.len() <= max_entries {
            return;
        }

        ready.sort_by_key(|(_, loaded_at)| *loaded_at);
        let excess = ready.len() - max_entries;
        for (key, _) in ready.into_iter().take(excess) {
            self.entries.remove(&key);
            debug!(key = %key, max_entries, "Evicted oldest entry");
        }
    }
}

/// Settles a pending entry exactly once, even when the fetch task unwinds.
struct FetchGuard<S: ResourceSource> {
    inner: Arc<Inner<S>>,
    key: String,
    tx: broadcast::Sender<LoadOutcome>,
    armed: bool,
}

impl<S: ResourceSource> FetchGuard<S> {
    fn settle(mut self, outcome: LoadOutcome) {
        self.armed = false;
        self.inner.settle(&self.key, &self.tx, outcome);
    }
}

impl<S: ResourceSource> Drop for FetchGuard<S> {
    fn drop(&mut self) {
        if self.armed {
            self.armed = false;
            let error = LoadError::Internal(format!("fetch of '{}' aborted", self.key));
            self.inner.settle(&self.key, &self.tx, Err(error));
        }
    }
}
