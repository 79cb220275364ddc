//! Cleanup passes run on matcher output.
//!
//! Each pass is idempotent and so is the full pipeline: running
//! [`postprocess`] on its own output changes nothing.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use unicode_segmentation::UnicodeSegmentation;

use crate::engine::numbers::spell_numeral;

/// Words that read badly when repeated back to back.
///
/// Only words that rule templates emit belong here. Single letters and words
/// like `in` or `is` can be variables or products of variables in the input.
pub const CONNECTORS: [&str; 11] = [
    "of", "the", "to", "and", "by", "from", "over", "with", "times", "plus", "minus",
];

/// Innermost numeral marker left by `{@num …}` and `{@ord …}` placeholders.
static NUMERAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(num|ord)\(([^()#]*)\)").expect("valid regex literal"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex literal"));

static SPACE_BEFORE_CLOSER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ([,.;:!?)])").expect("valid regex literal"));

static SPACE_AFTER_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\( ").expect("valid regex literal"));

type Pass = fn(&str) -> String;

/// Passes in the order they run.
const PASSES: [(&str, Pass); 3] = [
    ("numerals", expand_numerals),
    ("connectors", collapse_connectors),
    ("spacing", normalize_spacing),
];

/// Run every cleanup pass over `text`.
///
/// # Example
///
/// ```
/// use mathspeak::engine::postprocess;
///
/// let spoken = postprocess("the #ord(2) derivative of  of x ,");
/// assert_eq!(spoken, "the second derivative of x,");
/// ```
pub fn postprocess(text: &str) -> String {
    PASSES
        .iter()
        .fold(text.to_string(), |current, (_, pass)| pass(&current))
}

/// Replace numeral markers with words, innermost first.
///
/// Markers around anything other than a numeral are unwrapped.
pub fn expand_numerals(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let expanded = NUMERAL_MARKER.replace_all(&current, |caps: &Captures<'_>| {
            let content = &caps[2];
            spell_numeral(content, &caps[1] == "ord").unwrap_or_else(|| content.to_string())
        });
        if expanded == current {
            return current;
        }
        current = expanded.into_owned();
    }
}

fn is_connector(word: &str) -> bool {
    CONNECTORS.iter().any(|c| c.eq_ignore_ascii_case(word))
}

/// Drop a connector word that repeats the word before it across nothing
/// but whitespace, e.g. `"of of"` becomes `"of"`.
pub fn collapse_connectors(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut pending_space: Vec<&str> = Vec::new();
    let mut last_word: Option<&str> = None;

    for segment in text.split_word_bounds() {
        if segment.chars().all(char::is_whitespace) {
            pending_space.push(segment);
            continue;
        }
        if is_connector(segment) && last_word.is_some_and(|w| w.eq_ignore_ascii_case(segment)) {
            pending_space.clear();
            continue;
        }
        output.extend(pending_space.drain(..));
        output.push_str(segment);
        last_word = segment
            .chars()
            .all(char::is_alphanumeric)
            .then_some(segment);
    }
    output.extend(pending_space);
    output
}

/// Collapse whitespace and tidy it around punctuation.
pub fn normalize_spacing(text: &str) -> String {
    let single = WHITESPACE_RUN.replace_all(text, " ");
    let closed = SPACE_BEFORE_CLOSER.replace_all(&single, "$1");
    let opened = SPACE_AFTER_OPENER.replace_all(&closed, "(");
    opened.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_markers_expand_from_the_inside() {
        assert_eq!(expand_numerals("#ord(#num(3))"), "three");
        assert_eq!(expand_numerals("#num(n)"), "n");
        assert_eq!(expand_numerals("x #num(12) y"), "x twelve y");
    }

    #[test]
    fn connectors_only_collapse_across_whitespace() {
        assert_eq!(collapse_connectors("of of x"), "of x");
        assert_eq!(collapse_connectors("The the end"), "The end");
        assert_eq!(collapse_connectors("of, of"), "of, of");
        assert_eq!(collapse_connectors("x x"), "x x");
        assert_eq!(collapse_connectors("to to to"), "to");
    }

    #[test]
    fn spacing() {
        assert_eq!(normalize_spacing("  f ( x ) ,  y . "), "f (x), y.");
    }

    #[test]
    fn pass_names_are_unique() {
        let names: Vec<_> = PASSES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["numerals", "connectors", "spacing"]);
    }
}
