//! In-memory response cache with a freshness window
//!
//! Entries are keyed by a deterministic request signature and stamped with the
//! time they were stored. A lookup only counts as a hit while the entry is
//! younger than the freshness window; stale entries stay in the map until they
//! are overwritten by the next successful fetch or removed by `purge_expired`.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Source of the current time for freshness checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A single cached value and when it was written
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Session-scoped cache mapping request keys to fetched values
///
/// The map is guarded by a mutex so that a shared `&TimedCache` can be used
/// from several joined futures. The lock is only held for map access and is
/// always released before a fetch is awaited, so two callers racing on the
/// same expired key may both fetch; the later write wins.
pub struct TimedCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    freshness_window: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TimedCache<V> {
    /// Creates an empty cache using the system clock
    pub fn new(freshness_window: Duration) -> Self {
        Self::with_clock(freshness_window, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`
    pub fn with_clock(freshness_window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            freshness_window,
            clock,
        }
    }

    /// How long an entry stays valid after it is stored
    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // Entries are written whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.freshness_window
    }

    /// Returns the cached value for `key` if it is still fresh
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        self.entries()
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, stamped with the current time
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let stored_at = self.clock.now();
        self.entries()
            .insert(key.into(), CacheEntry { value, stored_at });
    }

    /// Returns the fresh value for `key`, or runs `fetch` and caches its result
    ///
    /// # Arguments
    /// * `key` - Request signature, e.g. `pokemon-25`
    /// * `fetch` - Performs the actual retrieval on a miss
    ///
    /// # Returns
    /// * `Ok(V)` - The cached value, or the freshly fetched one
    /// * `Err(E)` - The fetch error, unchanged. Any earlier entry under `key`
    ///   is left as it was.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            debug!("cache hit: {}", key);
            return Ok(value);
        }

        debug!("cache miss: {}", key);
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Removes the entry for `key`, returning whether one existed
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    /// Drops every entry that is no longer fresh
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| now - entry.stored_at < self.freshness_window);
        before - entries.len()
    }

    /// Removes all entries
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<V> std::fmt::Debug for TimedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or_default();
        f.debug_struct("TimedCache")
            .field("entries", &len)
            .field("freshness_window", &self.freshness_window)
            .finish()
    }
}

/// Clock whose time only moves when told to
///
/// Exposed for tests across the crate.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    millis: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn at_millis(millis: i64) -> Arc<Self> {
        Arc::new(Self {
            millis: std::sync::atomic::AtomicI64::new(millis),
        })
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis
            .store(millis, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis.load(std::sync::atomic::Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis).expect("test clock within chrono range")
    }
}
