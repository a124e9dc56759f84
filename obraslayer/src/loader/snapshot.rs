//! Aggregate snapshots and their listeners

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::error::LoadError;
use super::resource::ParsedResource;
use crate::mapper::ProjectUnit;

/// Result of an aggregate load: resources that loaded and per-key errors.
#[derive(Debug, Clone, Default)]
pub struct AggregateSnapshot {
    pub resources: BTreeMap<String, Arc<ParsedResource>>,
    pub errors: BTreeMap<String, LoadError>,
}

impl AggregateSnapshot {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.errors.is_empty()
    }

    /// All units across resources, in key order.
    pub fn units(&self) -> impl Iterator<Item = &ProjectUnit> {
        self.resources.values().flat_map(|r| r.units.iter())
    }

    pub fn unit_count(&self) -> usize {
        self.resources.values().map(|r| r.units.len()).sum()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&AggregateSnapshot) + Send + Sync>;

/// Registered listeners plus the latest published snapshot.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    inner: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Listener>,
    current: Option<Arc<AggregateSnapshot>>,
}

impl ListenerRegistry {
    /// Registers a listener; notifies it at once if a snapshot exists.
    pub fn subscribe(&self, listener: Listener) -> ListenerId {
        let (id, current) = {
            let mut state = self.inner.lock();
            let id = ListenerId(state.next_id);
            state.next_id += 1;
            state.listeners.insert(id, Arc::clone(&listener));
            (id, state.current.clone())
        };

        if let Some(snapshot) = current {
            listener(snapshot.as_ref());
        }
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.lock().listeners.remove(&id).is_some()
    }

    /// Stores `snapshot` and calls every listener with it.
    ///
    /// Listeners run outside the lock so they may subscribe or read.
    pub fn publish(&self, snapshot: Arc<AggregateSnapshot>) {
        let listeners: Vec<Listener> = {
            let mut state = self.inner.lock();
            state.current = Some(Arc::clone(&snapshot));
            state.listeners.values().cloned().collect()
        };

        debug!(
            listeners = listeners.len(),
            resources = snapshot.resources.len(),
            errors = snapshot.errors.len(),
            "Publishing snapshot"
        );
        for listener in listeners {
            listener(snapshot.as_ref());
        }
    }

    pub fn current(&self) -> Option<Arc<AggregateSnapshot>> {
        self.inner.lock().current.clone()
    }

    /// Drops every listener and the stored snapshot.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.listeners.clear();
        state.current = None;
    }
}
