use std::mem;
use std::time::{Duration, Instant};

/// A cached value with its expiry and access bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub created_at: Instant,
    pub ttl: Duration,
    /// Recency tick of the last read or write. Larger is more recent.
    pub last_access: u64,
    pub hits: u64,
}

impl<V> CacheEntry<V> {
    pub fn new(key: String, value: V, ttl: Duration, tick: u64) -> Self {
        Self {
            key,
            value,
            created_at: Instant::now(),
            ttl,
            last_access: tick,
            hits: 0,
        }
    }

    /// An entry is expired once its age reaches its TTL, so a zero TTL is
    /// never served.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }

    /// Record a hit at `tick`, returning the previous tick.
    pub fn touch(&mut self, tick: u64) -> u64 {
        self.hits += 1;
        mem::replace(&mut self.last_access, tick)
    }
}
