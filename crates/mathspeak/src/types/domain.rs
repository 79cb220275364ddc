use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A mathematical subject area used to scope rule applicability.
///
/// `General` is the catch-all: rules in the general domain are candidates
/// for every expression, and expressions that score in no other domain are
/// classified as general.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    General,
    Algebra,
    Calculus,
    Geometry,
    Trigonometry,
    LinearAlgebra,
    Statistics,
    SetTheory,
    Logic,
    NumberTheory,
}

impl Domain {
    /// Every domain, in declaration order.
    pub const ALL: [Domain; 10] = [
        Domain::General,
        Domain::Algebra,
        Domain::Calculus,
        Domain::Geometry,
        Domain::Trigonometry,
        Domain::LinearAlgebra,
        Domain::Statistics,
        Domain::SetTheory,
        Domain::Logic,
        Domain::NumberTheory,
    ];

    /// Scored domains in tie-break order. The first entry wins a tie.
    ///
    /// Reordering this list reclassifies expressions that score equally in
    /// two domains.
    pub const DETECTION_ORDER: [Domain; 9] = [
        Domain::Calculus,
        Domain::LinearAlgebra,
        Domain::Statistics,
        Domain::Trigonometry,
        Domain::SetTheory,
        Domain::Logic,
        Domain::NumberTheory,
        Domain::Geometry,
        Domain::Algebra,
    ];

    /// The serialized name of this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::General => "general",
            Domain::Algebra => "algebra",
            Domain::Calculus => "calculus",
            Domain::Geometry => "geometry",
            Domain::Trigonometry => "trigonometry",
            Domain::LinearAlgebra => "linear_algebra",
            Domain::Statistics => "statistics",
            Domain::SetTheory => "set_theory",
            Domain::Logic => "logic",
            Domain::NumberTheory => "number_theory",
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, Domain::General)
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown domain '{name}'")]
pub struct UnknownDomain {
    pub name: String,
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| UnknownDomain {
                name: s.to_string(),
            })
    }
}
