//! The shared cache store and per-context scope handles.

use super::{CacheKey, ScopeFingerprint};
use crate::diagnostics::Warning;
use dashmap::DashMap;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

type CachedValue = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    scope: ScopeFingerprint,
    bucket: &'static str,
    key: String,
}

/// Backing storage for one processing round.
struct CacheStore {
    id: Uuid,
    entries: DashMap<EntryKey, CachedValue>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// A scope inside the store.
#[derive(Debug)]
struct CacheScope {
    key: CacheKey,
    fingerprint: ScopeFingerprint,
    parent: Option<Arc<CacheScope>>,
}

/// Hit and miss counters of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the store.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Values held by the store.
    pub entries: usize,
}

/// A handle on one scope of a round's cache store.
///
/// Cloning the handle or forking a nested scope never copies the store.
/// Lookups that miss in a scope fall back to enclosing scopes for as long as
/// no scope on the way introduced converters; new values are always written
/// to the handle's own scope.
#[derive(Clone)]
pub struct Cache {
    store: Arc<CacheStore>,
    scope: Arc<CacheScope>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    /// Creates a fresh store and returns its root scope.
    #[must_use]
    pub fn new() -> Self {
        let key = CacheKey::root();
        let fingerprint = key.fingerprint();
        Self {
            store: Arc::new(CacheStore {
                id: Uuid::new_v4(),
                entries: DashMap::new(),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }),
            scope: Arc::new(CacheScope {
                key,
                fingerprint,
                parent: None,
            }),
        }
    }

    /// Returns a nested scope in the same store.
    #[must_use]
    pub fn fork(&self, converter_classes: BTreeSet<String>, suppressed: BTreeSet<Warning>) -> Self {
        let key = CacheKey::child(self.scope.fingerprint.clone(), converter_classes, suppressed);
        let fingerprint = key.fingerprint();
        Self {
            store: Arc::clone(&self.store),
            scope: Arc::new(CacheScope {
                key,
                fingerprint,
                parent: Some(Arc::clone(&self.scope)),
            }),
        }
    }

    /// Returns the cached value for `key` in `bucket`, computing it on a miss.
    pub fn get_or_compute<T, F>(&self, bucket: &'static str, key: &str, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(bucket, key) {
            self.store.hits.fetch_add(1, Ordering::Relaxed);
            return value;
        }

        self.store.misses.fetch_add(1, Ordering::Relaxed);
        // Computed outside the map lock: `compute` may consult the cache itself.
        let value = compute();
        let entry_key = self.entry_key(bucket, key);
        let stored = self
            .store
            .entries
            .entry(entry_key)
            .or_insert_with(|| Arc::new(value.clone()) as CachedValue)
            .clone();

        stored.downcast_ref::<T>().cloned().unwrap_or(value)
    }

    /// Returns the cached value for `key` in `bucket`, without computing.
    #[must_use]
    pub fn get<T>(&self, bucket: &'static str, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut scope = Some(&self.scope);
        while let Some(current) = scope {
            let entry_key = EntryKey {
                scope: current.fingerprint.clone(),
                bucket,
                key: key.to_string(),
            };
            if let Some(found) = self.store.entries.get(&entry_key) {
                if let Some(value) = found.downcast_ref::<T>() {
                    return Some(value.clone());
                }
            }
            if current.key.introduces_converters() {
                break;
            }
            scope = current.parent.as_ref();
        }
        None
    }

    /// Returns the scope fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> &ScopeFingerprint {
        &self.scope.fingerprint
    }

    /// Returns the key the scope was created under.
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.scope.key
    }

    /// Returns the id of the backing store.
    #[must_use]
    pub fn store_id(&self) -> Uuid {
        self.store.id
    }

    /// Returns true when both handles use the same store.
    #[must_use]
    pub fn shares_store_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Returns the store counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.store.hits.load(Ordering::Relaxed),
            misses: self.store.misses.load(Ordering::Relaxed),
            entries: self.store.entries.len(),
        }
    }

    fn entry_key(&self, bucket: &'static str, key: &str) -> EntryKey {
        EntryKey {
            scope: self.scope.fingerprint.clone(),
            bucket,
            key: key.to_string(),
        }
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.store.id)
            .field("scope", &self.scope.fingerprint)
            .field("entries", &self.store.entries.len())
            .finish()
    }
}
