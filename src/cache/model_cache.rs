use crate::error::Result;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Thread-safe bounded cache of constructed model clients, keyed by model id.
///
/// Keeps at most `capacity` clients resident, evicting the least-recently-used
/// beyond that. Population runs under a per-key lock so two concurrent
/// requests for the same model id construct a single client.
pub struct ModelCache<T> {
    slots: Mutex<LruCache<String, Arc<T>>>,
    loading: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<T> ModelCache<T> {
    /// Create a new cache holding at most `capacity` clients.
    ///
    /// A capacity of 0 is clamped to 1 (LRU cache requires non-zero capacity).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1))
            .expect("Cache capacity must be at least 1");

        Self {
            slots: Mutex::new(LruCache::new(cap)),
            loading: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached client for `id`, constructing it with `load` on a miss.
    ///
    /// A failed load is propagated and cached nothing; the next caller retries.
    pub fn get_or_load<F>(&self, id: &str, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        if let Some(found) = self.slots.lock().unwrap().get(id) {
            return Ok(Arc::clone(found));
        }

        // Per-key lock: concurrent misses for the same id serialize here,
        // all other ids load in parallel.
        let key_lock = {
            let mut loading = self.loading.lock().unwrap();
            Arc::clone(loading.entry(id.to_string()).or_default())
        };
        let _guard = key_lock.lock().unwrap();

        // Another caller may have finished the load while we waited.
        if let Some(found) = self.slots.lock().unwrap().get(id) {
            self.loading.lock().unwrap().remove(id);
            return Ok(Arc::clone(found));
        }

        let result = load(id).map(Arc::new);
        if let Ok(ref handle) = result {
            self.slots.lock().unwrap().put(id.to_string(), Arc::clone(handle));
        }
        self.loading.lock().unwrap().remove(id);
        result
    }

    /// Get the current number of resident clients
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.slots.lock().unwrap().is_empty()
    }

    /// True if a client for `id` is currently resident (does not touch LRU order)
    pub fn contains(&self, id: &str) -> bool {
        self.slots.lock().unwrap().contains(id)
    }
}
