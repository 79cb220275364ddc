//! Output template parser.
//!
//! Rule output templates are plain speech text with placeholders that pull
//! in capture groups from the rule's match. This module parses template
//! strings into an AST that the matcher renders once per substitution.

pub mod ast;
pub mod error;
mod template;

pub use ast::*;
pub use error::ParseError;
pub use template::parse_template;
