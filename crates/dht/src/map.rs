//! A thread-safe map with batched access under a single lock acquisition.
//!
//! Routing bookkeeping touches many entries per message; `process`,
//! `process_shared` and `process_range` run a caller-supplied closure with
//! the lock held once instead of re-locking per entry. The closures must
//! not call back into the same map — batched access is deliberately
//! non-reentrant. Keys are ordered so range batching has a meaning.

use std::collections::BTreeMap;
use std::ops::RangeBounds;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A `RwLock`-protected ordered map shared between message-processing tasks.
#[derive(Debug, Default)]
pub struct SharedMap<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K: Ord, V> SharedMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        SharedMap {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    /// Inserts a value, returning the previous one if present.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.write().insert(key, value)
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.write().remove(key)
    }

    /// True if the key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.read().contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Runs `action` with exclusive access, locking once.
    pub fn process<R>(&self, action: impl FnOnce(&mut BTreeMap<K, V>) -> R) -> R {
        action(&mut self.write())
    }

    /// Runs `action` with shared access, locking once.
    pub fn process_shared<R>(&self, action: impl FnOnce(&BTreeMap<K, V>) -> R) -> R {
        action(&self.read())
    }

    /// Runs `action` on every entry whose key falls in `range`, with
    /// exclusive access and locking once.
    pub fn process_range(&self, range: impl RangeBounds<K>, mut action: impl FnMut(&K, &mut V)) {
        for (key, value) in self.write().range_mut(range) {
            action(key, value);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<K, V>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<K, V>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K: Ord, V: Clone> SharedMap<K, V> {
    /// Returns a clone of the value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.read().get(key).cloned()
    }
}
