use std::time::Duration;

use serde::Serialize;

use crate::engine::SpeechWarning;
use crate::types::{AudienceLevel, Domain, ExpressionCategory};

/// The analyzed subject of one speech request.
///
/// Created per request by [`analyze`](crate::analyzer::analyze), which fills
/// in the derived fields. The matcher only writes to
/// [`processing`](Self::processing). Records are never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionRecord {
    /// The expression exactly as supplied.
    pub raw: String,
    pub audience: AudienceLevel,
    pub context: String,
    pub domain_hint: Option<Domain>,
    /// The hint when one was supplied, otherwise the best-scoring domain.
    pub domain: Domain,
    pub category: ExpressionCategory,
    pub complexity: ComplexityMetrics,
    pub processing: ProcessingMetadata,
}

impl ExpressionRecord {
    /// Record a warning, ignoring exact duplicates.
    pub fn add_warning(&mut self, warning: SpeechWarning) {
        if !self.processing.warnings.contains(&warning) {
            self.processing.warnings.push(warning);
        }
    }

    pub fn warnings(&self) -> &[SpeechWarning] {
        &self.processing.warnings
    }
}

/// Structural complexity measures of an expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplexityMetrics {
    /// Deepest brace nesting reached.
    pub nesting_depth: usize,
    /// Occurrences of escaped commands such as `\frac`.
    pub command_count: usize,
    /// Distinct single-letter variables.
    pub variable_count: usize,
    pub operator_count: usize,
    /// Occurrences of named functions such as `\sin` or `\log`.
    pub special_function_count: usize,
    /// Length in characters.
    pub length: usize,
    /// Weighted overall score in `0.0..=10.0`.
    pub overall_score: f64,
}

/// What happened while an expression was transformed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingMetadata {
    /// Rule ids in application order. A rule appears once per substitution.
    pub rules_applied: Vec<String>,
    /// One entry per substitution, with the span it produced.
    pub applied_spans: Vec<AppliedRule>,
    pub warnings: Vec<SpeechWarning>,
    /// Number of passes run over the text.
    pub passes: usize,
    pub elapsed: Duration,
    pub cache_hit: bool,
}

/// A single substitution made by the matcher.
///
/// `start..end` is the byte span of the substituted text as it stood at the
/// end of pass `pass`. Spans from the same pass never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedRule {
    pub rule_id: String,
    pub pass: usize,
    pub start: usize,
    pub end: usize,
}

impl AppliedRule {
    pub fn overlaps(&self, other: &AppliedRule) -> bool {
        self.pass == other.pass && self.start < other.end && other.start < self.end
    }
}
