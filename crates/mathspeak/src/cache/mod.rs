//! Result cache.
//!
//! Finished speech results are cached under the request
//! [`Fingerprint`](crate::types::Fingerprint), with per-entry expiry and
//! least-recently-used eviction once the cache is full.

mod entry;
mod stats;
mod store;

pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ResultCache;
