//! Miette diagnostic wrapper for rule file errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![expect(unused_assignments)]

use std::path::Path;

use mathspeak::{LoadError, RuleError};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic pointing into a rule file.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(mathspeak::rules))]
pub struct RuleFileDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl RuleFileDiagnostic {
    /// Create a diagnostic from a load error and the file it came from.
    ///
    /// Returns `None` for I/O errors, which have no location in the file.
    pub fn from_load_error(path: &Path, content: &str, err: &LoadError) -> Option<Self> {
        let (offset, message, help) = match err {
            LoadError::Io { .. } => return None,
            LoadError::Parse {
                line,
                column,
                message,
                ..
            } => (line_column_offset(content, *line, *column), message.clone(), None),
            LoadError::Rule { index, source, .. } => {
                let offset = rule_id(source)
                    .and_then(|id| content.find(&format!("\"{id}\"")))
                    .unwrap_or(0);
                (offset, format!("rule #{index}: {source}"), help_for(source))
            }
        };

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        Some(RuleFileDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message,
            help,
        })
    }
}

/// Convert a 1-based line and column to a byte offset.
fn line_column_offset(content: &str, line: usize, column: usize) -> usize {
    content
        .lines()
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum::<usize>()
        + column.saturating_sub(1)
}

fn rule_id(error: &RuleError) -> Option<&str> {
    match error {
        RuleError::DuplicateRule { id }
        | RuleError::RuleNotFound { id, .. }
        | RuleError::MissingField { id, .. }
        | RuleError::PriorityOutOfRange { id, .. }
        | RuleError::InvalidPattern { id, .. }
        | RuleError::InvalidTemplate { id, .. }
        | RuleError::UndefinedCapture { id, .. } => Some(id),
        RuleError::EmptyId => None,
    }
}

fn help_for(error: &RuleError) -> Option<String> {
    match error {
        RuleError::MissingField { field, .. } => {
            Some(format!("add a \"{field}\" entry to this record"))
        }
        RuleError::PriorityOutOfRange { .. } => {
            Some("priorities range from 0 to 2000, higher applies first".to_string())
        }
        RuleError::UndefinedCapture { .. } => Some(
            "templates may only use groups the pattern defines; literal patterns only define {0}"
                .to_string(),
        ),
        RuleError::DuplicateRule { .. } => Some("rule ids must be unique".to_string()),
        RuleError::RuleNotFound { .. }
        | RuleError::EmptyId
        | RuleError::InvalidPattern { .. }
        | RuleError::InvalidTemplate { .. } => None,
    }
}
