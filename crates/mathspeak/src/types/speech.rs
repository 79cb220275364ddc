use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::engine::SpeechWarning;
use crate::types::{AudienceLevel, Domain, ExpressionCategory, PronunciationHints};

/// Context tag used when a request does not name one.
pub const DEFAULT_CONTEXT: &str = "general";

/// One request to turn an expression into speech.
///
/// # Example
///
/// ```
/// use mathspeak::{AudienceLevel, SpeechRequest};
///
/// let request = SpeechRequest::builder()
///     .expression(r"\frac{1}{2}")
///     .audience(AudienceLevel::Elementary)
///     .build();
///
/// assert_eq!(request.context, "general");
/// assert!(request.domain_hint.is_none());
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct SpeechRequest {
    pub expression: String,

    #[builder(default)]
    #[serde(default)]
    pub audience: AudienceLevel,

    /// Syntactic setting of the expression, compared against rule contexts.
    #[builder(default = DEFAULT_CONTEXT.to_string())]
    #[serde(default = "default_context")]
    pub context: String,

    /// Skips domain detection when set.
    #[serde(default)]
    pub domain_hint: Option<Domain>,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

impl SpeechRequest {
    /// A request with default audience and context.
    pub fn new(expression: impl Into<String>) -> Self {
        SpeechRequest::builder().expression(expression).build()
    }
}

/// Speakable text plus everything a caller needs to render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Speech {
    pub text: String,
    /// Pronunciation hints of the rules that fired, in application order.
    pub hints: Vec<RuleHint>,
    pub metadata: SpeechMetadata,
}

/// Pronunciation hints contributed by one applied rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleHint {
    pub rule_id: String,
    pub hints: PronunciationHints,
}

/// Provenance of a speech result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechMetadata {
    pub rules_applied: Vec<String>,
    pub warnings: Vec<SpeechWarning>,
    pub elapsed: Duration,
    pub cache_hit: bool,
    pub domain: Domain,
    pub category: ExpressionCategory,
    pub complexity_score: f64,
    /// Cache key of the request.
    pub fingerprint: String,
}
