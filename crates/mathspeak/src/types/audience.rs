use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target listener sophistication.
///
/// The audience does not influence rule selection inside the engine, but it
/// is part of the cache fingerprint so results for different audiences are
/// never shared.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AudienceLevel {
    Elementary,
    #[default]
    Undergraduate,
    Graduate,
    Research,
}

impl AudienceLevel {
    pub const ALL: [AudienceLevel; 4] = [
        AudienceLevel::Elementary,
        AudienceLevel::Undergraduate,
        AudienceLevel::Graduate,
        AudienceLevel::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceLevel::Elementary => "elementary",
            AudienceLevel::Undergraduate => "undergraduate",
            AudienceLevel::Graduate => "graduate",
            AudienceLevel::Research => "research",
        }
    }
}

impl Display for AudienceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown audience level '{name}'")]
pub struct UnknownAudience {
    pub name: String,
}

impl FromStr for AudienceLevel {
    type Err = UnknownAudience;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudienceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownAudience {
                name: s.to_string(),
            })
    }
}
