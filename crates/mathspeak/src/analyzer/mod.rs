//! Expression analysis.
//!
//! The analyzer computes structural metadata for a raw expression (domain,
//! category, complexity) without rewriting anything. It never fails:
//! malformed input degrades to warnings on the returned record so the
//! matcher always has something to work with.

mod category;
mod complexity;
mod domain;
mod tokens;

use tracing::trace;

pub use category::classify;
pub use complexity::{MAX_SCORE, measure};
pub use domain::{detect_domain, domain_scores};
pub use tokens::{Token, TokenKind, tokenize};

use crate::types::{AudienceLevel, Domain, ExpressionRecord, ProcessingMetadata};

/// Analyze `raw` and produce a fresh [`ExpressionRecord`].
///
/// A `domain_hint` bypasses domain detection entirely.
///
/// # Example
///
/// ```
/// use mathspeak::analyzer::analyze;
/// use mathspeak::{AudienceLevel, Domain, ExpressionCategory};
///
/// let record = analyze(r"\int_0^1 x^2 dx", "general", AudienceLevel::default(), None);
/// assert_eq!(record.domain, Domain::Calculus);
/// assert_eq!(record.category, ExpressionCategory::Integral);
/// ```
pub fn analyze(
    raw: &str,
    context: &str,
    audience: AudienceLevel,
    domain_hint: Option<Domain>,
) -> ExpressionRecord {
    let tokens = tokenize(raw);
    let (complexity, warnings) = measure(raw, &tokens);
    let domain = domain_hint.unwrap_or_else(|| detect_domain(raw, &tokens));
    let category = classify(raw, &tokens, complexity.nesting_depth);

    trace!(
        %domain,
        %category,
        score = complexity.overall_score,
        depth = complexity.nesting_depth,
        "analyzed expression"
    );

    let mut record = ExpressionRecord {
        raw: raw.to_string(),
        audience,
        context: context.to_string(),
        domain_hint,
        domain,
        category,
        complexity,
        processing: ProcessingMetadata::default(),
    };
    for warning in warnings {
        record.add_warning(warning);
    }
    record
}
