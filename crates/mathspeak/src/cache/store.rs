use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::entry::CacheEntry;
use crate::cache::stats::{CacheStats, Counters};

/// Bounded, expiring, least-recently-used cache.
///
/// Every operation takes a single lock, so each insert makes exactly one
/// eviction decision and concurrent writes to the same key resolve to the
/// last writer. Hit and miss counters live outside the lock and survive
/// [`clear`](Self::clear).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use mathspeak::cache::ResultCache;
///
/// let cache = ResultCache::new(2);
/// cache.put("a", 1, Duration::from_secs(60));
/// cache.put("b", 2, Duration::from_secs(60));
/// assert_eq!(cache.get("a"), Some(1));
///
/// // "b" is now least recently used.
/// cache.put("c", 3, Duration::from_secs(60));
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.stats().evictions, 1);
/// ```
#[derive(Debug)]
pub struct ResultCache<V> {
    capacity: usize,
    state: Mutex<CacheState<V>>,
    counters: Counters,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency index: access tick to key, oldest first.
    recency: BTreeMap<u64, String>,
    next_tick: u64,
}

impl<V> CacheState<V> {
    fn tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.last_access);
        Some(entry)
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

impl<V: Clone> ResultCache<V> {
    /// A cache holding at most `capacity` entries. A capacity of zero
    /// disables storage: every `put` is dropped and every `get` misses.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                next_tick: 0,
            }),
            counters: Counters::default(),
        }
    }

    /// Look up `key`, refreshing its recency on a hit.
    ///
    /// An expired entry is removed and counts as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        let now = Instant::now();

        let expired = match state.entries.get(key) {
            None => {
                Counters::bump(&self.counters.misses);
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };
        if expired {
            state.remove(key);
            Counters::bump(&self.counters.expirations);
            Counters::bump(&self.counters.misses);
            trace!(key, "cache entry expired");
            return None;
        }

        let tick = state.tick();
        let CacheState {
            entries, recency, ..
        } = &mut *state;
        let entry = entries.get_mut(key)?;
        let previous = entry.touch(tick);
        recency.remove(&previous);
        recency.insert(tick, key.to_string());
        Counters::bump(&self.counters.hits);
        Some(entry.value.clone())
    }

    /// Store `value` under `key` for `ttl`, replacing any existing entry.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry first.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        let mut state = self.state.lock();

        let replaced = state.remove(&key).is_some();
        if !replaced && state.entries.len() >= self.capacity {
            if let Some(evicted) = state.evict_oldest() {
                Counters::bump(&self.counters.evictions);
                trace!(key = %evicted, "evicted least recently used entry");
            }
        }

        let tick = state.tick();
        state.recency.insert(tick, key.clone());
        state
            .entries
            .insert(key.clone(), CacheEntry::new(key, value, ttl, tick));
    }

    /// Whether a live entry exists for `key`. Does not touch recency or
    /// counters.
    pub fn contains(&self, key: &str) -> bool {
        let state = self.state.lock();
        state
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    pub fn stats(&self) -> CacheStats {
        let size = self.state.lock().entries.len();
        self.counters.snapshot(size, self.capacity)
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.state.lock().recency.values().cloned().collect()
    }
}
