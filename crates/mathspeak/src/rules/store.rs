//! The rule store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::mem;
use std::ops::RangeInclusive;
use std::sync::Arc;

use bon::Builder;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::rules::{RuleError, compute_suggestions};
use crate::types::{Domain, MatchKind, Rule};

/// Holds validated rules, indexed by id.
///
/// The store is populated once at startup and is read-mostly afterwards.
/// Lookups take a shared lock and hand out `Arc<Rule>` snapshots, so
/// concurrent readers never block each other and never observe a partially
/// written rule. Administrative mutation (`add`, `update`, `delete`,
/// `clear`) takes the exclusive lock.
///
/// Every list-returning lookup is in application order: priority
/// descending, then id ascending.
///
/// # Example
///
/// ```
/// use mathspeak::{Domain, Rule, RuleStore};
///
/// let store = RuleStore::new();
/// store.add(
///     Rule::builder()
///         .id("half")
///         .pattern(r"\frac{1}{2}")
///         .match_kind(mathspeak::MatchKind::Literal)
///         .output_template("one half")
///         .priority(1000)
///         .domain(Domain::General)
///         .build()
///         .unwrap(),
/// ).unwrap();
///
/// assert_eq!(store.count(), 1);
/// assert!(store.add(store.get_by_id("half").unwrap().as_ref().clone()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: RwLock<BTreeMap<String, Arc<Rule>>>,
}

/// Application order: higher priority first, ties by ascending id.
pub fn application_order(a: &Rule, b: &Rule) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| a.id().cmp(b.id()))
}

fn sorted(mut rules: Vec<Arc<Rule>>) -> Vec<Arc<Rule>> {
    rules.sort_by(|a, b| application_order(a, b));
    rules
}

impl RuleStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rules, failing on the first duplicate id.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self, RuleError> {
        let store = Self::new();
        for rule in rules {
            store.add(rule)?;
        }
        Ok(store)
    }

    /// Insert a new rule. Fails if the id is already taken.
    pub fn add(&self, rule: Rule) -> Result<(), RuleError> {
        let mut rules = self.rules.write();
        if rules.contains_key(rule.id()) {
            return Err(RuleError::DuplicateRule {
                id: rule.id().to_string(),
            });
        }
        debug!(id = rule.id(), priority = rule.priority(), "rule added");
        rules.insert(rule.id().to_string(), Arc::new(rule));
        Ok(())
    }

    /// Insert a batch of rules atomically: either every rule is added or
    /// none is. On failure returns the batch index of the offending rule.
    pub(crate) fn insert_batch(&self, batch: Vec<Rule>) -> Result<usize, (usize, RuleError)> {
        let mut rules = self.rules.write();
        for (index, rule) in batch.iter().enumerate() {
            let repeated = batch[..index].iter().any(|r| r.id() == rule.id());
            if repeated || rules.contains_key(rule.id()) {
                return Err((
                    index,
                    RuleError::DuplicateRule {
                        id: rule.id().to_string(),
                    },
                ));
            }
        }
        let count = batch.len();
        for rule in batch {
            rules.insert(rule.id().to_string(), Arc::new(rule));
        }
        Ok(count)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Arc<Rule>> {
        self.rules.read().get(id).cloned()
    }

    /// All rules, active or not.
    pub fn get_all(&self) -> Vec<Arc<Rule>> {
        self.select(|_| true)
    }

    /// Rules declared for exactly `domain`.
    pub fn find_by_domain(&self, domain: Domain) -> Vec<Arc<Rule>> {
        self.select(|rule| rule.domain() == domain)
    }

    pub fn find_by_priority_range(&self, range: RangeInclusive<u16>) -> Vec<Arc<Rule>> {
        self.select(|rule| range.contains(&rule.priority()))
    }

    /// Rules allowed to fire in `context`, including wildcard rules.
    pub fn find_by_context(&self, context: &str) -> Vec<Arc<Rule>> {
        self.select(|rule| rule.contexts().allows(context))
    }

    pub fn find_by_filters(&self, filter: &RuleFilter) -> Vec<Arc<Rule>> {
        self.select(|rule| filter.matches(rule))
    }

    /// Active rules eligible for an expression: same domain or general, and
    /// allowed in `context`.
    pub fn candidates(&self, domain: Domain, context: &str) -> Vec<Arc<Rule>> {
        self.select(|rule| rule.applies_to(domain, context))
    }

    /// Replace an existing rule, returning the previous version.
    pub fn update(&self, rule: Rule) -> Result<Arc<Rule>, RuleError> {
        let mut rules = self.rules.write();
        match rules.get_mut(rule.id()) {
            Some(slot) => {
                debug!(id = rule.id(), "rule updated");
                Ok(mem::replace(slot, Arc::new(rule)))
            }
            None => Err(not_found(rule.id(), &rules)),
        }
    }

    /// Remove a rule by id, returning it.
    pub fn delete(&self, id: &str) -> Result<Arc<Rule>, RuleError> {
        let mut rules = self.rules.write();
        let removed = rules.remove(id);
        removed.ok_or_else(|| not_found(id, &rules))
    }

    pub fn count(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    pub fn get_statistics(&self) -> RuleStatistics {
        let rules = self.rules.read();
        let mut stats = RuleStatistics {
            total: rules.len(),
            ..RuleStatistics::default()
        };
        for rule in rules.values() {
            if rule.is_active() {
                stats.active += 1;
            }
            *stats.by_domain.entry(rule.domain()).or_default() += 1;
            match rule.pattern().kind() {
                MatchKind::Regex => stats.regex_rules += 1,
                MatchKind::Literal => stats.literal_rules += 1,
            }
            let priority = rule.priority();
            stats.min_priority = Some(stats.min_priority.map_or(priority, |p| p.min(priority)));
            stats.max_priority = Some(stats.max_priority.map_or(priority, |p| p.max(priority)));
        }
        stats
    }

    /// Remove every rule.
    pub fn clear(&self) {
        self.rules.write().clear();
        debug!("rule store cleared");
    }

    fn select(&self, predicate: impl Fn(&Rule) -> bool) -> Vec<Arc<Rule>> {
        let snapshot: Vec<Arc<Rule>> = self
            .rules
            .read()
            .values()
            .filter(|rule| predicate(rule))
            .cloned()
            .collect();
        sorted(snapshot)
    }
}

fn not_found(id: &str, rules: &BTreeMap<String, Arc<Rule>>) -> RuleError {
    RuleError::RuleNotFound {
        id: id.to_string(),
        suggestions: compute_suggestions(id, rules.keys().map(String::as_str)),
    }
}

/// Compound lookup filter. Unset fields match everything.
///
/// # Example
///
/// ```
/// use mathspeak::{Domain, RuleFilter, RuleStore};
///
/// let store = RuleStore::with_default_rules().unwrap();
/// let filter = RuleFilter::builder()
///     .domain(Domain::Calculus)
///     .min_priority(500)
///     .active(true)
///     .build();
/// let rules = store.find_by_filters(&filter);
/// assert!(rules.iter().all(|r| r.domain() == Domain::Calculus && r.priority() >= 500));
/// ```
#[derive(Debug, Clone, Default, Builder)]
#[builder(on(String, into))]
pub struct RuleFilter {
    pub domain: Option<Domain>,
    pub min_priority: Option<u16>,
    pub max_priority: Option<u16>,
    pub context: Option<String>,
    pub active: Option<bool>,
    pub match_kind: Option<MatchKind>,
}

impl RuleFilter {
    pub fn matches(&self, rule: &Rule) -> bool {
        self.domain.is_none_or(|domain| rule.domain() == domain)
            && self.min_priority.is_none_or(|min| rule.priority() >= min)
            && self.max_priority.is_none_or(|max| rule.priority() <= max)
            && self
                .context
                .as_deref()
                .is_none_or(|context| rule.contexts().allows(context))
            && self.active.is_none_or(|active| rule.is_active() == active)
            && self
                .match_kind
                .is_none_or(|kind| rule.pattern().kind() == kind)
    }
}

/// Summary counts over the store's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleStatistics {
    pub total: usize,
    pub active: usize,
    pub by_domain: BTreeMap<Domain, usize>,
    pub min_priority: Option<u16>,
    pub max_priority: Option<u16>,
    pub regex_rules: usize,
    pub literal_rules: usize,
}
