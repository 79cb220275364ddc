//! Complexity metrics.

use std::collections::BTreeSet;

use crate::analyzer::category::FUNCTION_COMMANDS;
use crate::analyzer::tokens::{Token, TokenKind};
use crate::engine::SpeechWarning;
use crate::types::ComplexityMetrics;

/// Commands whose braced argument is a name, not mathematics.
const TEXT_COMMANDS: [&str; 7] = [
    "begin",
    "end",
    "text",
    "textrm",
    "textit",
    "mathrm",
    "operatorname",
];

const OPERATOR_COMMANDS: [&str; 22] = [
    "times", "cdot", "div", "pm", "mp", "leq", "geq", "neq", "le", "ge", "ne", "lt", "gt",
    "approx", "equiv", "to", "rightarrow", "cup", "cap", "land", "lor", "circ",
];

/// Weight and saturation point of each scored factor.
struct Factor {
    weight: f64,
    saturation: f64,
}

const DEPTH: Factor = Factor {
    weight: 3.0,
    saturation: 5.0,
};
const COMMANDS: Factor = Factor {
    weight: 2.0,
    saturation: 10.0,
};
const OPERATORS: Factor = Factor {
    weight: 1.5,
    saturation: 12.0,
};
const SPECIAL_FUNCTIONS: Factor = Factor {
    weight: 2.0,
    saturation: 4.0,
};
const LENGTH: Factor = Factor {
    weight: 1.5,
    saturation: 200.0,
};

/// Highest possible overall score.
pub const MAX_SCORE: f64 = 10.0;

impl Factor {
    fn score(&self, value: usize) -> f64 {
        // counts stay far below 2^52, so the conversion is exact
        let normalized = (value as f64 / self.saturation).min(1.0);
        normalized * self.weight
    }
}

/// Brace nesting result.
struct Nesting {
    depth: usize,
    warnings: Vec<SpeechWarning>,
}

/// Track brace balance. The running depth never goes below zero: an
/// unmatched `}` is recorded as a warning and otherwise ignored.
fn nesting(tokens: &[Token<'_>]) -> Nesting {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut warnings = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::OpenBrace => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            TokenKind::CloseBrace => {
                if depth == 0 {
                    warnings.push(SpeechWarning::UnbalancedBraces {
                        position: token.offset,
                    });
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
    }
    if depth > 0 {
        warnings.push(SpeechWarning::UnclosedBraces { open: depth });
    }
    Nesting {
        depth: max_depth,
        warnings,
    }
}

/// Compute all complexity metrics for `raw`.
///
/// Malformed nesting never fails; it produces warnings alongside the metrics.
pub fn measure(raw: &str, tokens: &[Token<'_>]) -> (ComplexityMetrics, Vec<SpeechWarning>) {
    let Nesting { depth, warnings } = nesting(tokens);

    let mut command_count = 0;
    let mut operator_count = 0;
    let mut special_function_count = 0;
    let mut variables: BTreeSet<char> = BTreeSet::new();
    // brace depth at which a text-like argument started, if inside one
    let mut text_argument: Option<usize> = None;
    let mut pending_text_command = false;
    let mut brace_depth = 0usize;

    for token in tokens {
        match token.kind {
            TokenKind::Command(name) => {
                command_count += 1;
                if FUNCTION_COMMANDS.contains(&name) {
                    special_function_count += 1;
                }
                if OPERATOR_COMMANDS.contains(&name) {
                    operator_count += 1;
                }
                pending_text_command = TEXT_COMMANDS.contains(&name);
            }
            TokenKind::OpenBrace => {
                brace_depth += 1;
                if pending_text_command && text_argument.is_none() {
                    text_argument = Some(brace_depth);
                }
                pending_text_command = false;
            }
            TokenKind::CloseBrace => {
                if text_argument == Some(brace_depth) {
                    text_argument = None;
                }
                brace_depth = brace_depth.saturating_sub(1);
            }
            TokenKind::Letter(c) => {
                if text_argument.is_none() {
                    variables.insert(c);
                }
                pending_text_command = false;
            }
            TokenKind::Operator(_) => {
                operator_count += 1;
                pending_text_command = false;
            }
            TokenKind::Whitespace => {}
            TokenKind::EscapedSymbol(_) | TokenKind::Number(_) | TokenKind::Other(_) => {
                pending_text_command = false;
            }
        }
    }

    let length = raw.chars().count();
    let overall_score = (DEPTH.score(depth)
        + COMMANDS.score(command_count)
        + OPERATORS.score(operator_count)
        + SPECIAL_FUNCTIONS.score(special_function_count)
        + LENGTH.score(length))
    .min(MAX_SCORE);

    let metrics = ComplexityMetrics {
        nesting_depth: depth,
        command_count,
        variable_count: variables.len(),
        operator_count,
        special_function_count,
        length,
        overall_score,
    };
    (metrics, warnings)
}
