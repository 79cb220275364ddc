//! Expression category classification.
//!
//! Predicates run in a fixed order and the first match wins. Moving a
//! predicate reclassifies existing expressions.

use std::collections::BTreeSet;

use crate::analyzer::tokens::{Token, TokenKind, commands};
use crate::types::ExpressionCategory;

/// Named functions recognised as function calls.
pub const FUNCTION_COMMANDS: [&str; 21] = [
    "sin", "cos", "tan", "sec", "csc", "cot", "arcsin", "arccos", "arctan", "sinh", "cosh",
    "tanh", "log", "ln", "exp", "sqrt", "det", "gcd", "lcm", "max", "min",
];

const INTEGRAL_COMMANDS: [&str; 4] = ["int", "iint", "iiint", "oint"];

const INEQUALITY_COMMANDS: [&str; 10] = [
    "leq", "geq", "le", "ge", "neq", "ne", "lt", "gt", "ll", "gg",
];

const MATRIX_ENVIRONMENTS: [&str; 6] = [
    "\\begin{matrix}",
    "\\begin{pmatrix}",
    "\\begin{bmatrix}",
    "\\begin{vmatrix}",
    "\\begin{Bmatrix}",
    "\\begin{smallmatrix}",
];

/// Longest expression still considered simple.
const SIMPLE_MAX_LENGTH: usize = 24;

/// Deepest nesting still considered simple.
const SIMPLE_MAX_DEPTH: usize = 1;

/// Classify `raw` into a category.
pub fn classify(raw: &str, tokens: &[Token<'_>], nesting_depth: usize) -> ExpressionCategory {
    let names: BTreeSet<&str> = commands(tokens).collect();
    let has = |name: &str| names.contains(name);

    if ["\\frac{d", "\\dfrac{d", "\\frac{\\partial", "\\dfrac{\\partial"]
        .iter()
        .any(|marker| raw.contains(marker))
    {
        ExpressionCategory::Derivative
    } else if INTEGRAL_COMMANDS.iter().any(|c| names.contains(c)) {
        ExpressionCategory::Integral
    } else if has("partial") {
        ExpressionCategory::Derivative
    } else if has("lim") {
        ExpressionCategory::Limit
    } else if has("sum") {
        if raw.contains("^{\\infty}") || raw.contains("^\\infty") {
            ExpressionCategory::Series
        } else {
            ExpressionCategory::Sum
        }
    } else if has("prod") {
        ExpressionCategory::Product
    } else if MATRIX_ENVIRONMENTS.iter().any(|env| raw.contains(env)) {
        ExpressionCategory::Matrix
    } else if raw.contains(['<', '>']) || INEQUALITY_COMMANDS.iter().any(|c| names.contains(c)) {
        ExpressionCategory::Inequality
    } else if FUNCTION_COMMANDS.iter().any(|c| names.contains(c)) || has_applied_letter(tokens) {
        ExpressionCategory::FunctionCall
    } else if raw.contains('=') {
        ExpressionCategory::Equation
    } else if has("frac") || has("dfrac") || has("tfrac") {
        ExpressionCategory::Fraction
    } else if raw.chars().count() <= SIMPLE_MAX_LENGTH && nesting_depth <= SIMPLE_MAX_DEPTH {
        ExpressionCategory::Simple
    } else {
        ExpressionCategory::Complex
    }
}

/// A lone letter immediately followed by `(`, as in `f(x)`.
fn has_applied_letter(tokens: &[Token<'_>]) -> bool {
    tokens.windows(3).any(|window| {
        let standalone = !matches!(window[0].kind, TokenKind::Letter(_) | TokenKind::Command(_));
        standalone
            && matches!(window[1].kind, TokenKind::Letter(_))
            && window[2].kind == TokenKind::Other('(')
    }) || matches!(
        tokens,
        [
            Token {
                kind: TokenKind::Letter(_),
                ..
            },
            Token {
                kind: TokenKind::Other('('),
                ..
            },
            ..
        ]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tokens::tokenize;

    fn category(raw: &str) -> ExpressionCategory {
        classify(raw, &tokenize(raw), 1)
    }

    #[test]
    fn applied_letter_at_start_and_after_space() {
        assert_eq!(category("f(x)"), ExpressionCategory::FunctionCall);
        assert_eq!(category(r"2 g(t)"), ExpressionCategory::FunctionCall);
    }

    #[test]
    fn word_followed_by_paren_is_not_a_call() {
        // "ab(" is a product of variables, not f applied to an argument
        assert_eq!(category("ab(c)"), ExpressionCategory::Simple);
    }

    #[test]
    fn derivative_fraction_beats_fraction() {
        assert_eq!(category(r"\frac{d}{dx}"), ExpressionCategory::Derivative);
        assert_eq!(category(r"\frac{a}{b}"), ExpressionCategory::Fraction);
    }
}
