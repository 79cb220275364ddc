//! Error types for rule definitions and rule loading.

use std::path::PathBuf;

use strsim::levenshtein;
use thiserror::Error;

/// A malformed, duplicate or missing rule.
///
/// These only surface while rules are loaded or administered, never while
/// an expression is being transformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A rule with this id is already in the store.
    #[error("duplicate rule id '{id}'")]
    DuplicateRule { id: String },

    /// No rule with this id is in the store.
    #[error("rule not found: '{id}'{}", suggestion_suffix(suggestions))]
    RuleNotFound {
        id: String,
        suggestions: Vec<String>,
    },

    /// A required record field is absent.
    #[error("rule '{id}' is missing required field '{field}'")]
    MissingField { id: String, field: &'static str },

    #[error("rule id must not be empty")]
    EmptyId,

    #[error("rule '{id}' has priority {priority}, expected 0..=2000")]
    PriorityOutOfRange { id: String, priority: i64 },

    #[error("rule '{id}' has an invalid pattern: {message}")]
    InvalidPattern { id: String, message: String },

    #[error("rule '{id}' has an invalid output template: {message}")]
    InvalidTemplate { id: String, message: String },

    /// The output template names a capture group the pattern never produces.
    #[error("rule '{id}' references undefined capture group {group}")]
    UndefinedCapture { id: String, group: String },
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Errors that occur while loading rule records.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a rule file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a well-formed list of rule records.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// A record parsed but failed validation.
    #[error("{path}: rule #{index}: {source}")]
    Rule {
        path: PathBuf,
        index: usize,
        #[source]
        source: RuleError,
    },
}

/// Find up to three ids within a small edit distance of `id`, closest first.
pub fn compute_suggestions<'a>(id: &str, available: impl Iterator<Item = &'a str>) -> Vec<String> {
    let max_distance = if id.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .filter_map(|candidate| {
            let dist = levenshtein(id, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort();
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
