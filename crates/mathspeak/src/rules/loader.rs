//! Loading rule records from JSON.
//!
//! The declarative rule format is authored elsewhere; this module accepts
//! its JSON encoding (a list of records, or an object with a `rules` list),
//! validates every record and reports the first failure with its position.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::rules::{LoadError, RuleRecord, RuleStore};
use crate::types::Rule;

/// The rule set bundled with the crate.
const DEFAULT_RULES: &str = include_str!("../../rules/default.json");

/// Object form of a rule file: `{ "rules": [ ... ] }`.
#[derive(Deserialize)]
struct RuleDocument {
    rules: Vec<RuleRecord>,
}

/// Parse rule records without validating them.
///
/// Accepts either a bare list of records or an object with a `rules` list.
pub fn parse_rule_records(content: &str) -> Result<Vec<RuleRecord>, serde_json::Error> {
    if content.trim_start().starts_with('[') {
        serde_json::from_str(content)
    } else {
        serde_json::from_str::<RuleDocument>(content).map(|document| document.rules)
    }
}

/// Parse and validate rules from a JSON string.
pub fn load_rules_str(content: &str) -> Result<Vec<Rule>, LoadError> {
    load_rules_internal(content, None)
}

/// Parse and validate rules from a JSON file.
pub fn load_rules_file(path: impl AsRef<Path>) -> Result<Vec<Rule>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_rules_internal(&content, Some(path))
}

fn display_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("<string>"))
}

fn load_rules_internal(content: &str, path: Option<&Path>) -> Result<Vec<Rule>, LoadError> {
    let records = parse_rule_records(content).map_err(|e| LoadError::Parse {
        path: display_path(path),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record.into_rule().map_err(|source| LoadError::Rule {
                path: display_path(path),
                index,
                source,
            })
        })
        .collect()
}

impl RuleStore {
    /// A store holding the bundled default rule set.
    pub fn with_default_rules() -> Result<Self, LoadError> {
        let store = Self::new();
        store.load_str(DEFAULT_RULES)?;
        Ok(store)
    }

    /// Load rules from a JSON string into this store.
    ///
    /// Loading is all-or-nothing: if any record is invalid or any id is
    /// already taken, the store is left unchanged.
    pub fn load_str(&self, content: &str) -> Result<usize, LoadError> {
        let rules = load_rules_str(content)?;
        self.insert_loaded(rules, None)
    }

    /// Load rules from a JSON file into this store. All-or-nothing, like
    /// [`load_str`](Self::load_str).
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let rules = load_rules_file(path)?;
        self.insert_loaded(rules, Some(path))
    }

    fn insert_loaded(&self, rules: Vec<Rule>, path: Option<&Path>) -> Result<usize, LoadError> {
        let count = self
            .insert_batch(rules)
            .map_err(|(index, source)| LoadError::Rule {
                path: display_path(path),
                index,
                source,
            })?;
        info!(count, path = %display_path(path).display(), "loaded rules");
        Ok(count)
    }
}
