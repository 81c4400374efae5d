//! Fragment stores.
//!
//! The store is shared across every render in the process and is not locked
//! by the render core: two renders racing on the same key may both render and
//! both write. Writes for identical inputs are identical, so the race is benign.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A key-value store of rendered fragments.
pub trait FragmentStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: String);

    /// Remove a fragment, returning whether one was present.
    fn delete(&self, key: &str) -> bool;
}

/// Hit/miss counters of a [`MemoryFragmentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FragmentStats {
    pub hits: usize,
    pub misses: usize,
    pub writes: usize,
}

impl FragmentStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Concurrent in-memory fragment store.
#[derive(Debug, Default)]
pub struct MemoryFragmentStore {
    fragments: DashMap<String, String>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> FragmentStats {
        FragmentStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fragments.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Drop every fragment and reset the counters.
    pub fn clear(&self) {
        self.fragments.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }
}

impl FragmentStore for MemoryFragmentStore {
    fn read(&self, key: &str) -> Option<String> {
        match self.fragments.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn write(&self, key: &str, value: String) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.fragments.insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) -> bool {
        self.fragments.remove(key).is_some()
    }
}
