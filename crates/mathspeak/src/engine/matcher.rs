//! Rule selection and ordered application.
//!
//! Rules run in passes. Within a pass every candidate rule, in application
//! order, rewrites each of its matches that does not touch text already
//! produced earlier in the same pass. Passes repeat until the text stops
//! changing or the pass limit is hit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::engine::{EngineConfig, SpeechError, SpeechWarning, TimeoutReason};
use crate::parser::{GroupRef, OutputTemplate};
use crate::rules::{RuleStore, application_order};
use crate::types::{AppliedRule, Condition, ConditionKind, ExpressionRecord, MatchSpec, Rule};

/// Characters inspected on each side of a match by `preceded_by` and
/// `followed_by` conditions.
pub const CONDITION_WINDOW: usize = 24;

/// Bounds on a single transformation.
#[derive(Debug, Clone)]
pub struct MatchLimits {
    pub max_passes: usize,
    pub max_substitutions: usize,
    /// Point in time after which the transformation is aborted.
    pub deadline: Option<Instant>,
    /// Budget the deadline was derived from, for error reporting.
    pub budget: Duration,
}

impl Default for MatchLimits {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            max_passes: config.max_passes,
            max_substitutions: config.max_substitutions,
            deadline: None,
            budget: config.timeout,
        }
    }
}

impl MatchLimits {
    /// Limits for a request that started at `started`.
    pub fn from_config(config: &EngineConfig, started: Instant) -> Self {
        Self {
            max_passes: config.max_passes.max(1),
            max_substitutions: config.max_substitutions,
            deadline: started.checked_add(config.timeout),
            budget: config.timeout,
        }
    }

    fn check_deadline(&self) -> Result<(), SpeechError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SpeechError::Timeout {
                reason: TimeoutReason::Deadline {
                    budget: self.budget,
                },
            }),
            _ => Ok(()),
        }
    }
}

/// Active rules eligible for `record`, in application order.
pub fn select_candidates(store: &RuleStore, record: &ExpressionRecord) -> Vec<Arc<Rule>> {
    store.candidates(record.domain, &record.context)
}

/// Transform `record.raw` with the rules in `store`.
///
/// Updates the record's processing metadata (applied rules, spans,
/// warnings, pass count) and returns the rewritten text.
pub fn transform(
    record: &mut ExpressionRecord,
    store: &RuleStore,
    limits: &MatchLimits,
) -> Result<String, SpeechError> {
    let candidates = select_candidates(store, record);
    apply_rules(record, &candidates, limits)
}

/// A match located in the current text, with its rendered replacement.
struct Site {
    start: usize,
    end: usize,
    replacement: String,
}

/// Find the first match of `pattern` at or after byte `from`.
///
/// This is the only place that distinguishes regex rules from literal rules.
fn find_match(pattern: &MatchSpec, template: &OutputTemplate, text: &str, from: usize) -> Option<Site> {
    if from > text.len() {
        return None;
    }
    match pattern {
        MatchSpec::Regex(regex) => {
            let captures = regex.captures_at(text, from)?;
            let whole = captures.get(0)?;
            let replacement = template.render(|group| match group {
                GroupRef::Index(index) => captures.get(*index).map(|m| m.as_str()),
                GroupRef::Name(name) => captures.name(name).map(|m| m.as_str()),
            });
            Some(Site {
                start: whole.start(),
                end: whole.end(),
                replacement,
            })
        }
        MatchSpec::Literal(literal) => {
            let start = from + text[from..].find(literal.as_str())?;
            let end = start + literal.len();
            let matched = &text[start..end];
            let replacement =
                template.render(|group| matches!(group, GroupRef::Index(0)).then_some(matched));
            Some(Site {
                start,
                end,
                replacement,
            })
        }
    }
}

/// Whether the `contains` conditions of `rule` hold for the whole text.
fn text_conditions_hold(rule: &Rule, text: &str) -> bool {
    rule.conditions()
        .iter()
        .filter(|c| c.kind == ConditionKind::Contains)
        .all(|c| text.contains(c.text.as_str()) != c.negate)
}

/// Whether the window conditions of `rule` hold around `start..end`.
fn window_conditions_hold(rule: &Rule, text: &str, start: usize, end: usize) -> bool {
    rule.conditions().iter().all(|condition| match condition.kind {
        ConditionKind::Contains => true,
        ConditionKind::PrecededBy => window_check(condition, window_before(text, start)),
        ConditionKind::FollowedBy => window_check(condition, window_after(text, end)),
    })
}

fn window_check(condition: &Condition, window: &str) -> bool {
    window.contains(condition.text.as_str()) != condition.negate
}

fn window_before(text: &str, start: usize) -> &str {
    let before = &text[..start];
    let window_start = before
        .char_indices()
        .rev()
        .nth(CONDITION_WINDOW - 1)
        .map_or(0, |(i, _)| i);
    &before[window_start..]
}

fn window_after(text: &str, end: usize) -> &str {
    let after = &text[end..];
    let window_end = after
        .char_indices()
        .nth(CONDITION_WINDOW)
        .map_or(after.len(), |(i, _)| i);
    &after[..window_end]
}

/// Byte offset of the character after the one at `offset`.
fn next_char_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| offset + c.len_utf8())
}

/// Apply `candidates` to `record.raw`.
///
/// Candidates are filtered for eligibility and sorted into application
/// order (priority descending, id ascending) before use, so the output
/// depends only on the rule set and the input text.
///
/// Empty matches are skipped. A rule never rewrites text produced by
/// another substitution in the same pass; it can do so in the next pass.
pub fn apply_rules(
    record: &mut ExpressionRecord,
    candidates: &[Arc<Rule>],
    limits: &MatchLimits,
) -> Result<String, SpeechError> {
    let mut rules: Vec<&Rule> = candidates
        .iter()
        .map(Arc::as_ref)
        .filter(|rule| rule.applies_to(record.domain, &record.context))
        .collect();
    rules.sort_by(|a, b| application_order(a, b));

    let mut text = record.raw.clone();
    let mut matched_any = false;
    let mut substitutions = 0usize;

    for pass in 1..=limits.max_passes {
        record.processing.passes = pass;
        let mut produced: Vec<AppliedRule> = Vec::new();
        let mut changed = false;

        for rule in &rules {
            limits.check_deadline()?;
            if !text_conditions_hold(rule, &text) {
                continue;
            }

            let mut from = 0;
            while let Some(site) = find_match(rule.pattern(), rule.output_template(), &text, from) {
                let claimed = produced
                    .iter()
                    .any(|span| site.start < span.end && span.start < site.end);
                if site.start == site.end
                    || claimed
                    || !window_conditions_hold(rule, &text, site.start, site.end)
                {
                    from = next_char_boundary(&text, site.start);
                    continue;
                }

                substitutions += 1;
                if substitutions > limits.max_substitutions {
                    return Err(SpeechError::Timeout {
                        reason: TimeoutReason::SubstitutionLimit {
                            limit: limits.max_substitutions,
                        },
                    });
                }

                let new_end = site.start + site.replacement.len();
                trace!(
                    rule = rule.id(),
                    pass,
                    matched = &text[site.start..site.end],
                    replacement = %site.replacement,
                    "substitution"
                );
                changed |= text[site.start..site.end] != site.replacement;
                text.replace_range(site.start..site.end, &site.replacement);

                for span in &mut produced {
                    if span.start >= site.end {
                        span.start = span.start - site.end + new_end;
                        span.end = span.end - site.end + new_end;
                    }
                }
                produced.push(AppliedRule {
                    rule_id: rule.id().to_string(),
                    pass,
                    start: site.start,
                    end: new_end,
                });
                record.processing.rules_applied.push(rule.id().to_string());
                matched_any = true;
                from = new_end;
                limits.check_deadline()?;
            }
        }

        record.processing.applied_spans.extend(produced);
        if !changed {
            break;
        }
        if pass == limits.max_passes {
            record.add_warning(SpeechWarning::IterationCeiling { passes: pass });
        }
    }

    if !matched_any {
        record.add_warning(SpeechWarning::NoRuleMatched);
    }

    debug!(
        rules = record.processing.rules_applied.len(),
        passes = record.processing.passes,
        candidates = rules.len(),
        "transformed expression"
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_respect_char_boundaries() {
        let text = "ααααααααααααααααααααααααααααα|x";
        let bar = text.find('|').unwrap();
        assert_eq!(window_before(text, bar).chars().count(), CONDITION_WINDOW);
        assert_eq!(window_after(text, bar), "|x");
    }

    #[test]
    fn next_boundary_skips_multibyte() {
        assert_eq!(next_char_boundary("αb", 0), 2);
        assert_eq!(next_char_boundary("a", 1), 2);
    }
}
