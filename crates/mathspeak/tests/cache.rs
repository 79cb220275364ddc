//! Tests for the result cache and request fingerprints.

use std::thread;
use std::time::Duration;

use mathspeak::cache::ResultCache;
use mathspeak::{AudienceLevel, Domain, Fingerprint};

const MINUTE: Duration = Duration::from_secs(60);

#[test]
fn get_after_put() {
    let cache = ResultCache::new(4);
    cache.put("k", "v".to_string(), MINUTE);
    assert_eq!(cache.get("k").as_deref(), Some("v"));
    assert_eq!(cache.len(), 1);
    assert!(cache.contains("k"));
}

#[test]
fn put_replaces_existing_value_without_eviction() {
    let cache = ResultCache::new(1);
    cache.put("k", 1, MINUTE);
    cache.put("k", 2, MINUTE);
    assert_eq!(cache.get("k"), Some(2));
    assert_eq!(cache.stats().evictions, 0);
}

#[test]
fn least_recently_used_is_evicted_first() {
    let cache = ResultCache::new(3);
    cache.put("a", 1, MINUTE);
    cache.put("b", 2, MINUTE);
    cache.put("c", 3, MINUTE);
    cache.get("a");
    cache.put("d", 4, MINUTE);

    assert_eq!(cache.keys_by_recency(), ["c", "a", "d"]);
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn size_never_exceeds_capacity() {
    let cache = ResultCache::new(5);
    for i in 0..100 {
        cache.put(format!("key-{i}"), i, MINUTE);
        assert!(cache.len() <= 5);
    }
    let stats = cache.stats();
    assert_eq!(stats.size, 5);
    assert_eq!(stats.capacity, 5);
    assert_eq!(stats.evictions, 95);
}

#[test]
fn expired_entries_miss_and_are_removed() {
    let cache = ResultCache::new(4);
    cache.put("k", 1, Duration::ZERO);
    assert!(!cache.contains("k"));
    assert_eq!(cache.get("k"), None);

    let stats = cache.stats();
    assert_eq!(stats.expirations, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 0);
}

#[test]
fn ttl_elapses() {
    let cache = ResultCache::new(4);
    cache.put("k", 1, Duration::from_millis(20));
    assert_eq!(cache.get("k"), Some(1));
    thread::sleep(Duration::from_millis(40));
    assert_eq!(cache.get("k"), None);
}

#[test]
fn zero_capacity_stores_nothing() {
    let cache = ResultCache::new(0);
    cache.put("k", 1, MINUTE);
    assert!(cache.is_empty());
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.capacity(), 0);
}

#[test]
fn stats_track_hits_and_misses() {
    let cache = ResultCache::new(2);
    assert_eq!(cache.stats().hit_rate, 0.0);

    cache.put("k", 1, MINUTE);
    cache.get("k");
    cache.get("k");
    cache.get("k");
    cache.get("missing");

    let stats = cache.stats();
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
}

#[test]
fn clear_keeps_counters() {
    let cache = ResultCache::new(2);
    cache.put("k", 1, MINUTE);
    cache.get("k");
    cache.clear();

    assert!(cache.is_empty());
    assert!(cache.keys_by_recency().is_empty());
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.get("k"), None);
}

// =========================================================================
// Fingerprints
// =========================================================================

fn fingerprint(expr: &str, context: &str) -> Fingerprint {
    Fingerprint::new(expr, AudienceLevel::Undergraduate, context, Domain::Calculus)
}

#[test]
fn fingerprint_ignores_whitespace_layout() {
    assert_eq!(
        fingerprint(r"\int x  dx", "general"),
        fingerprint("  \\int x\ndx ", "general")
    );
}

#[test]
fn fingerprint_separates_every_field() {
    let base = fingerprint("x", "general");
    assert_ne!(base, fingerprint("y", "general"));
    assert_ne!(base, fingerprint("x", "inline"));
    assert_ne!(
        base,
        Fingerprint::new("x", AudienceLevel::Research, "general", Domain::Calculus)
    );
    assert_ne!(
        base,
        Fingerprint::new("x", AudienceLevel::Undergraduate, "general", Domain::Algebra)
    );
}

#[test]
fn fingerprint_key_is_sixteen_hex_digits() {
    let key = fingerprint("x", "general").to_key();
    assert_eq!(key.len(), 16);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
}
