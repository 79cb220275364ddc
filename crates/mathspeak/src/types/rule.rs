use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::bon;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::parser::{GroupRef, OutputTemplate, parse_template};
use crate::rules::RuleError;
use crate::types::Domain;

/// Inclusive upper bound for rule priorities.
pub const MAX_PRIORITY: u16 = 2000;

/// Context tag that makes a rule eligible in every context.
pub const ANY_CONTEXT: &str = "any";

/// Compiled regex programs larger than this are rejected at load time.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// How a rule's pattern is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Regex,
    Literal,
}

impl Display for MatchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MatchKind::Regex => f.write_str("regex"),
            MatchKind::Literal => f.write_str("literal"),
        }
    }
}

/// A compiled match pattern.
#[derive(Debug, Clone)]
pub enum MatchSpec {
    /// Regular expression with positional and named capture groups.
    Regex(Regex),
    /// Exact substring. Only group `0` (the whole match) is defined.
    Literal(String),
}

impl MatchSpec {
    pub fn kind(&self) -> MatchKind {
        match self {
            MatchSpec::Regex(_) => MatchKind::Regex,
            MatchSpec::Literal(_) => MatchKind::Literal,
        }
    }

    /// The pattern as written in the rule record.
    pub fn source(&self) -> &str {
        match self {
            MatchSpec::Regex(regex) => regex.as_str(),
            MatchSpec::Literal(literal) => literal,
        }
    }

    /// Whether a match of this pattern produces the given capture group.
    pub fn defines(&self, group: &GroupRef) -> bool {
        match (self, group) {
            (MatchSpec::Regex(regex), GroupRef::Index(index)) => *index < regex.captures_len(),
            (MatchSpec::Regex(regex), GroupRef::Name(name)) => {
                regex.capture_names().flatten().any(|n| n == name)
            }
            (MatchSpec::Literal(_), GroupRef::Index(index)) => *index == 0,
            (MatchSpec::Literal(_), GroupRef::Name(_)) => false,
        }
    }
}

/// Where a rule may fire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleContexts {
    /// Wildcard: every context tag.
    #[default]
    Any,
    /// Only the listed context tags.
    Tags(BTreeSet<String>),
}

impl RuleContexts {
    /// Build from a list of tags. A list containing `"any"` is the wildcard.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        if tags.contains(ANY_CONTEXT) {
            RuleContexts::Any
        } else {
            RuleContexts::Tags(tags)
        }
    }

    /// Whether a rule with these contexts may fire for `context`.
    pub fn allows(&self, context: &str) -> bool {
        match self {
            RuleContexts::Any => true,
            RuleContexts::Tags(tags) => tags.contains(context),
        }
    }
}

/// Which part of the surrounding text a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Text shortly before the match must contain `text`.
    PrecededBy,
    /// Text shortly after the match must contain `text`.
    FollowedBy,
    /// The whole current expression must contain `text`.
    Contains,
}

/// A predicate over the text surrounding a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub text: String,
    #[serde(default)]
    pub negate: bool,
}

impl Condition {
    pub fn preceded_by(text: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::PrecededBy,
            text: text.into(),
            negate: false,
        }
    }

    pub fn followed_by(text: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::FollowedBy,
            text: text.into(),
            negate: false,
        }
    }

    pub fn contains(text: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::Contains,
            text: text.into(),
            negate: false,
        }
    }

    /// Invert this condition.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}

/// Prosody hints handed untouched to the speech synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PronunciationHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_before_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_after_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
}

/// A declarative rewrite unit: match pattern to output template.
///
/// A `Rule` can only be built through [`Rule::builder`], which validates
/// every invariant: a non-empty id, a priority within `0..=2000`, a pattern
/// that compiles, a template that parses, and a template that only refers
/// to capture groups the pattern defines.
///
/// # Example
///
/// ```
/// use mathspeak::{Domain, Rule};
///
/// let rule = Rule::builder()
///     .id("fraction")
///     .pattern(r"\\frac\{(\d+)\}\{(\d+)\}")
///     .output_template("{1} over {2}")
///     .priority(500)
///     .domain(Domain::General)
///     .build()
///     .unwrap();
///
/// assert_eq!(rule.id(), "fraction");
/// assert!(rule.is_active());
///
/// let broken = Rule::builder()
///     .id("broken")
///     .pattern(r"\\sqrt\{(\d+)\}")
///     .output_template("root of {2}")
///     .priority(500)
///     .domain(Domain::General)
///     .build();
/// assert!(broken.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    pattern: MatchSpec,
    output_template: OutputTemplate,
    template_source: String,
    priority: u16,
    domain: Domain,
    contexts: RuleContexts,
    conditions: Vec<Condition>,
    active: bool,
    pronunciation_hints: Option<PronunciationHints>,
}

#[bon]
impl Rule {
    #[builder(on(String, into))]
    pub fn new(
        id: String,
        pattern: String,
        #[builder(default)] match_kind: MatchKind,
        output_template: String,
        priority: u16,
        domain: Domain,
        #[builder(default)] contexts: RuleContexts,
        #[builder(default)] conditions: Vec<Condition>,
        #[builder(default = true)] active: bool,
        pronunciation_hints: Option<PronunciationHints>,
    ) -> Result<Self, RuleError> {
        if id.trim().is_empty() {
            return Err(RuleError::EmptyId);
        }
        if priority > MAX_PRIORITY {
            return Err(RuleError::PriorityOutOfRange {
                id,
                priority: i64::from(priority),
            });
        }

        let compiled = match match_kind {
            MatchKind::Regex => RegexBuilder::new(&pattern)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map(MatchSpec::Regex)
                .map_err(|e| RuleError::InvalidPattern {
                    id: id.clone(),
                    message: e.to_string(),
                })?,
            MatchKind::Literal => {
                if pattern.is_empty() {
                    return Err(RuleError::InvalidPattern {
                        id,
                        message: "literal pattern is empty".to_string(),
                    });
                }
                MatchSpec::Literal(pattern)
            }
        };

        let template = parse_template(&output_template).map_err(|e| RuleError::InvalidTemplate {
            id: id.clone(),
            message: e.to_string(),
        })?;

        if let Some(group) = template.groups().find(|group| !compiled.defines(group)) {
            return Err(RuleError::UndefinedCapture {
                id,
                group: group.to_string(),
            });
        }

        Ok(Self {
            id,
            pattern: compiled,
            output_template: template,
            template_source: output_template,
            priority,
            domain,
            contexts,
            conditions,
            active,
            pronunciation_hints,
        })
    }
}

impl Rule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &MatchSpec {
        &self.pattern
    }

    pub fn output_template(&self) -> &OutputTemplate {
        &self.output_template
    }

    /// The output template as written in the rule record.
    pub fn template_source(&self) -> &str {
        &self.template_source
    }

    pub fn priority(&self) -> u16 {
        self.priority
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn contexts(&self) -> &RuleContexts {
        &self.contexts
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pronunciation_hints(&self) -> Option<&PronunciationHints> {
        self.pronunciation_hints.as_ref()
    }

    /// Return a copy of this rule with the active flag changed.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether this rule is a candidate for an expression in `domain` and `context`.
    pub fn applies_to(&self, domain: Domain, context: &str) -> bool {
        self.active
            && (self.domain.is_general() || self.domain == domain)
            && self.contexts.allows(context)
    }
}
