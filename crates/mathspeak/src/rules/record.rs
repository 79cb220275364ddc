//! Rule records as supplied by a loader, before validation.

use serde::{Deserialize, Serialize};

use crate::rules::RuleError;
use crate::types::{
    Condition, Domain, MAX_PRIORITY, MatchKind, PronunciationHints, Rule, RuleContexts,
};

/// One unvalidated rule record.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a [`RuleError::MissingField`] naming the rule, rather than a
/// generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub match_kind: MatchKind,
    #[serde(default)]
    pub output_template: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub pronunciation_hints: Option<PronunciationHints>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl RuleRecord {
    /// Validate this record and compile it into a [`Rule`].
    pub fn into_rule(self) -> Result<Rule, RuleError> {
        let id = self.id.ok_or_else(|| RuleError::MissingField {
            id: "<unnamed>".to_string(),
            field: "id",
        })?;
        let missing = |field: &'static str| RuleError::MissingField {
            id: id.clone(),
            field,
        };

        let pattern = self.pattern.ok_or_else(|| missing("pattern"))?;
        let output_template = self
            .output_template
            .ok_or_else(|| missing("output_template"))?;
        let priority = self.priority.ok_or_else(|| missing("priority"))?;
        let domain = self.domain.ok_or_else(|| missing("domain"))?;
        let contexts = self.contexts.ok_or_else(|| missing("contexts"))?;

        let priority = u16::try_from(priority)
            .ok()
            .filter(|p| *p <= MAX_PRIORITY)
            .ok_or_else(|| RuleError::PriorityOutOfRange {
                id: id.clone(),
                priority,
            })?;

        Rule::builder()
            .id(id)
            .pattern(pattern)
            .match_kind(self.match_kind)
            .output_template(output_template)
            .priority(priority)
            .domain(domain)
            .contexts(RuleContexts::from_tags(contexts))
            .conditions(self.conditions)
            .active(self.active.unwrap_or(true))
            .maybe_pronunciation_hints(self.pronunciation_hints)
            .build()
    }
}

impl TryFrom<RuleRecord> for Rule {
    type Error = RuleError;

    fn try_from(record: RuleRecord) -> Result<Self, Self::Error> {
        record.into_rule()
    }
}
