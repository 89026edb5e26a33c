//! A time-bounded key/value cache.

use lru::LruCache;
use parking_lot::Mutex;
use std::{fmt, hash::Hash, num::NonZeroUsize, time::Duration};
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A key/value cache whose entries expire after a per-entry time-to-live.
///
/// Expired entries are evicted lazily by the lookup that observes them; there is no background
/// sweep. The cache is unbounded unless created with [`TtlCache::with_capacity`], in which case
/// the least recently used entry is evicted on overflow.
///
/// Every operation holds the inner lock for its whole duration, so a lookup and the eviction it
/// triggers are atomic.
pub struct TtlCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, Entry<V>>>,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self { entries: Mutex::new(LruCache::unbounded()) }
    }

    /// Creates a cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self { entries: Mutex::new(LruCache::new(capacity)) }
    }

    /// Returns the value stored under `key` unless it has expired.
    ///
    /// An entry expires once the current time reaches `inserted_at + ttl`.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let entry = Entry { value, expires_at: Instant::now() + ttl };
        self.entries.lock().put(key, entry);
    }

    /// Number of entries held, including expired entries not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<K: Hash + Eq, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache").field("len", &self.entries.lock().len()).finish()
    }
}
