//! Terminal output helpers.

mod diagnostic;
pub mod table;

use std::fs::read_to_string;
use std::path::Path;

use mathspeak::LoadError;
use miette::{Report, miette};

pub use diagnostic::RuleFileDiagnostic;

/// Turn a load failure into a report, with source context when the rule
/// file can be read back.
pub fn load_error_report(path: Option<&Path>, err: &LoadError) -> Report {
    let diagnostic = path.and_then(|path| {
        let content = read_to_string(path).ok()?;
        RuleFileDiagnostic::from_load_error(path, &content, err)
    });
    match diagnostic {
        Some(diagnostic) => diagnostic.into(),
        None => miette!("{err}"),
    }
}
