pub mod analyzer;
pub mod cache;
pub mod engine;
pub mod parser;
pub mod rules;
pub mod types;

pub use engine::{Engine, EngineConfig, ErrorKind, SpeechError, SpeechWarning, TimeoutReason};
pub use rules::{LoadError, RuleError, RuleFilter, RuleRecord, RuleStatistics, RuleStore};
pub use types::{
    AudienceLevel, Condition, ConditionKind, Domain, ExpressionCategory, ExpressionRecord,
    Fingerprint, MatchKind, PronunciationHints, Rule, RuleContexts, Speech, SpeechRequest,
};
