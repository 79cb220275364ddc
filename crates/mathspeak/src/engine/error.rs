//! Error and warning types for speech generation.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// A request that could not be turned into speech.
///
/// Validation failures are raised before analysis, complexity failures
/// before transformation, and timeouts abort a transformation in progress.
/// Each is local to one request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpeechError {
    #[error("expression is empty")]
    EmptyInput,

    #[error("expression is {length} bytes long, the limit is {max}")]
    InputTooLong { length: usize, max: usize },

    #[error("invalid character {character:?} at byte {position}")]
    InvalidCharacter { character: char, position: usize },

    /// A complexity measure is above its configured ceiling.
    #[error("expression too complex: {metric} is {value}, the limit is {limit}")]
    ComplexityExceeded {
        metric: ComplexityLimit,
        value: f64,
        limit: f64,
    },

    /// Transformation ran past its wall-clock or substitution budget.
    #[error("transformation aborted: {reason}")]
    Timeout { reason: TimeoutReason },
}

impl SpeechError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpeechError::EmptyInput
            | SpeechError::InputTooLong { .. }
            | SpeechError::InvalidCharacter { .. } => ErrorKind::Validation,
            SpeechError::ComplexityExceeded { .. } => ErrorKind::Complexity,
            SpeechError::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

/// Coarse error classes for mapping to user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Complexity,
    Timeout,
}

/// Which complexity ceiling was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityLimit {
    NestingDepth,
    OverallScore,
}

impl Display for ComplexityLimit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ComplexityLimit::NestingDepth => f.write_str("nesting depth"),
            ComplexityLimit::OverallScore => f.write_str("complexity score"),
        }
    }
}

/// Why a transformation was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutReason {
    /// The per-request wall-clock budget ran out.
    Deadline { budget: Duration },
    /// More substitutions were attempted than the configured cap.
    SubstitutionLimit { limit: usize },
}

impl Display for TimeoutReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TimeoutReason::Deadline { budget } => {
                write!(f, "exceeded time budget of {}ms", budget.as_millis())
            }
            TimeoutReason::SubstitutionLimit { limit } => {
                write!(f, "exceeded {limit} substitutions")
            }
        }
    }
}

/// A non-fatal condition recorded while producing speech.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeechWarning {
    /// A `}` with no matching `{`. Nesting depth is clamped at zero.
    UnbalancedBraces { position: usize },
    /// Braces still open at the end of the expression.
    UnclosedBraces { open: usize },
    /// No rule matched; the expression is passed through unchanged.
    NoRuleMatched,
    /// The pass limit was reached while rules were still rewriting text.
    IterationCeiling { passes: usize },
}

impl Display for SpeechWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SpeechWarning::UnbalancedBraces { position } => {
                write!(f, "unmatched '}}' at byte {position}")
            }
            SpeechWarning::UnclosedBraces { open } => write!(f, "{open} unclosed '{{'"),
            SpeechWarning::NoRuleMatched => f.write_str("no rule matched"),
            SpeechWarning::IterationCeiling { passes } => {
                write!(f, "text still changing after {passes} passes")
            }
        }
    }
}
