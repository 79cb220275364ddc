//! Engine limits and cache settings.

use std::time::Duration;

use bon::Builder;

/// Tunable limits for an [`Engine`](crate::Engine).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use mathspeak::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .max_nesting_depth(4)
///     .timeout(Duration::from_millis(50))
///     .build();
/// assert_eq!(config.max_nesting_depth, 4);
/// assert_eq!(config.max_passes, 8);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct EngineConfig {
    /// Longest accepted expression, in bytes.
    #[builder(default = 4096)]
    pub max_input_length: usize,

    /// Deepest brace nesting accepted before transformation.
    #[builder(default = 12)]
    pub max_nesting_depth: usize,

    /// Highest overall complexity score accepted (inclusive).
    #[builder(default = 10.0)]
    pub max_complexity_score: f64,

    /// Passes over the text before giving up on reaching a fixed point.
    #[builder(default = 8)]
    pub max_passes: usize,

    /// Substitutions allowed per request before it is aborted.
    #[builder(default = 4096)]
    pub max_substitutions: usize,

    /// Wall-clock budget for one request.
    #[builder(default = Duration::from_millis(250))]
    pub timeout: Duration,

    /// Most results held in the cache.
    #[builder(default = 1024)]
    pub cache_capacity: usize,

    /// How long a cached result stays valid.
    #[builder(default = Duration::from_secs(3600))]
    pub cache_ttl: Duration,

    #[builder(default = true)]
    pub cache_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::builder().build()
    }
}
