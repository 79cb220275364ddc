//! The speech engine: validation, transformation and post-processing.

mod config;
mod error;
pub mod matcher;
pub mod numbers;
mod postprocess;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use bon::bon;
use tracing::{debug, warn};

use crate::analyzer::analyze;
use crate::cache::{CacheStats, ResultCache};
use crate::rules::{LoadError, RuleStore};
use crate::types::{
    ExpressionRecord, Fingerprint, Rule, RuleHint, Speech, SpeechMetadata, SpeechRequest,
    normalize_expression,
};

pub use config::EngineConfig;
pub use error::{ComplexityLimit, ErrorKind, SpeechError, SpeechWarning, TimeoutReason};
pub use matcher::{MatchLimits, apply_rules, select_candidates, transform};
pub use postprocess::{
    CONNECTORS, collapse_connectors, expand_numerals, normalize_spacing, postprocess,
};

/// Turns expressions into speech using a shared rule store.
///
/// An engine is `Send + Sync` and [`speak`](Self::speak) takes `&self`, so
/// one engine behind an `Arc` serves any number of threads.
///
/// # Example
///
/// ```
/// use mathspeak::{Engine, SpeechRequest};
///
/// let engine = Engine::with_default_rules().unwrap();
/// let speech = engine.speak(&SpeechRequest::new(r"\frac{1}{2}")).unwrap();
/// assert_eq!(speech.text, "one half");
/// ```
#[derive(Debug)]
pub struct Engine {
    store: Arc<RuleStore>,
    config: EngineConfig,
    cache: ResultCache<Speech>,
}

#[bon]
impl Engine {
    #[builder]
    pub fn new(#[builder(into)] store: Arc<RuleStore>, #[builder(default)] config: EngineConfig) -> Self {
        let capacity = if config.cache_enabled {
            config.cache_capacity
        } else {
            0
        };
        Self {
            store,
            config,
            cache: ResultCache::new(capacity),
        }
    }
}

impl Engine {
    /// An engine over the bundled default rules with default limits.
    pub fn with_default_rules() -> Result<Self, LoadError> {
        Ok(Engine::builder()
            .store(RuleStore::with_default_rules()?)
            .build())
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produce speech for `request`.
    ///
    /// Whitespace runs in the expression are collapsed to single spaces
    /// before analysis, so layout variants of one expression share both
    /// their result and their cache entry.
    ///
    /// Identical requests are answered from the cache while the cached
    /// result is live; the answer is the same as a fresh computation except
    /// for `cache_hit` and `elapsed`.
    pub fn speak(&self, request: &SpeechRequest) -> Result<Speech, SpeechError> {
        let started = Instant::now();
        validate(&request.expression, &self.config)?;

        // The cache key is derived from the normalized text, so everything
        // downstream must see that same text.
        let expression = normalize_expression(&request.expression);
        let mut record = analyze(
            &expression,
            &request.context,
            request.audience,
            request.domain_hint,
        );
        let fingerprint = Fingerprint::new(
            &expression,
            request.audience,
            &request.context,
            record.domain,
        )
        .to_key();

        if let Some(mut cached) = self.cache.get(&fingerprint) {
            debug!(%fingerprint, "cache hit");
            cached.metadata.cache_hit = true;
            cached.metadata.elapsed = started.elapsed();
            return Ok(cached);
        }

        check_complexity(&record, &self.config)?;

        let candidates = select_candidates(&self.store, &record);
        let limits = MatchLimits::from_config(&self.config, started);
        let transformed = apply_rules(&mut record, &candidates, &limits).inspect_err(|error| {
            warn!(%error, expression = %request.expression, "transformation aborted");
        })?;
        let text = postprocess(&transformed);
        record.processing.elapsed = started.elapsed();

        let speech = Speech {
            text,
            hints: collect_hints(&record, &candidates),
            metadata: SpeechMetadata {
                rules_applied: record.processing.rules_applied,
                warnings: record.processing.warnings,
                elapsed: record.processing.elapsed,
                cache_hit: false,
                domain: record.domain,
                category: record.category,
                complexity_score: record.complexity.overall_score,
                fingerprint: fingerprint.clone(),
            },
        };
        self.cache
            .put(fingerprint, speech.clone(), self.config.cache_ttl);
        Ok(speech)
    }

    /// Validate and analyze `request` without transforming it. The record
    /// describes the whitespace-normalized expression, as in [`speak`](Self::speak).
    pub fn analyze(&self, request: &SpeechRequest) -> Result<ExpressionRecord, SpeechError> {
        validate(&request.expression, &self.config)?;
        Ok(analyze(
            &normalize_expression(&request.expression),
            &request.context,
            request.audience,
            request.domain_hint,
        ))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached result. Hit and miss counters are kept.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Reject input that is empty, too long, or contains control characters
/// other than tab, newline and carriage return.
pub fn validate(expression: &str, config: &EngineConfig) -> Result<(), SpeechError> {
    if expression.trim().is_empty() {
        return Err(SpeechError::EmptyInput);
    }
    if expression.len() > config.max_input_length {
        return Err(SpeechError::InputTooLong {
            length: expression.len(),
            max: config.max_input_length,
        });
    }
    if let Some((position, character)) = expression
        .char_indices()
        .find(|(_, c)| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
    {
        return Err(SpeechError::InvalidCharacter {
            character,
            position,
        });
    }
    Ok(())
}

/// Refuse records whose nesting depth or overall score is above the
/// configured ceilings. Both ceilings are inclusive.
pub fn check_complexity(record: &ExpressionRecord, config: &EngineConfig) -> Result<(), SpeechError> {
    let complexity = &record.complexity;
    if complexity.nesting_depth > config.max_nesting_depth {
        return Err(SpeechError::ComplexityExceeded {
            metric: ComplexityLimit::NestingDepth,
            value: complexity.nesting_depth as f64,
            limit: config.max_nesting_depth as f64,
        });
    }
    if complexity.overall_score > config.max_complexity_score {
        return Err(SpeechError::ComplexityExceeded {
            metric: ComplexityLimit::OverallScore,
            value: complexity.overall_score,
            limit: config.max_complexity_score,
        });
    }
    Ok(())
}

/// Hints of the rules that fired, once per rule, in first-application
/// order.
fn collect_hints(record: &ExpressionRecord, candidates: &[Arc<Rule>]) -> Vec<RuleHint> {
    let mut seen = BTreeSet::new();
    record
        .processing
        .rules_applied
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| candidates.iter().find(|rule| rule.id() == id.as_str()))
        .filter_map(|rule| {
            rule.pronunciation_hints().map(|hints| RuleHint {
                rule_id: rule.id().to_string(),
                hints: hints.clone(),
            })
        })
        .collect()
}
