mod audience;
mod category;
mod domain;
mod expression;
mod fingerprint;
mod rule;
mod speech;

pub use audience::{AudienceLevel, UnknownAudience};
pub use category::ExpressionCategory;
pub use domain::{Domain, UnknownDomain};
pub use expression::{AppliedRule, ComplexityMetrics, ExpressionRecord, ProcessingMetadata};
pub use fingerprint::{Fingerprint, normalize_expression};
pub use rule::{
    ANY_CONTEXT, Condition, ConditionKind, MAX_PRIORITY, MatchKind, MatchSpec, PronunciationHints,
    Rule, RuleContexts,
};
pub use speech::{DEFAULT_CONTEXT, RuleHint, Speech, SpeechMetadata, SpeechRequest};
