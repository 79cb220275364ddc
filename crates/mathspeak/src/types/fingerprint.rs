use std::fmt::{Display, Formatter, Result as FmtResult};

use const_fnv1a_hash::fnv1a_hash_str_64;
use serde::{Deserialize, Serialize};

use super::{AudienceLevel, Domain};

/// Separator between fingerprint fields. Cannot appear in normalized text.
const FIELD_SEPARATOR: char = '\u{1f}';

/// A stable cache key for one speech request.
///
/// `Fingerprint` wraps a 64-bit FNV-1a hash over the normalized expression
/// text, audience level, context tag and the detected (or hinted) domain.
/// The same inputs always produce the same fingerprint, across processes.
///
/// # Example
///
/// ```
/// use mathspeak::{AudienceLevel, Domain, Fingerprint};
///
/// let a = Fingerprint::new(r"\frac{1}{2}", AudienceLevel::Undergraduate, "general", Domain::General);
/// let b = Fingerprint::new(r"  \frac{1}{2} ", AudienceLevel::Undergraduate, "general", Domain::General);
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint a request. Whitespace in `expression` is normalized first.
    pub fn new(expression: &str, audience: AudienceLevel, context: &str, domain: Domain) -> Self {
        let mut key = normalize_expression(expression);
        for field in [audience.as_str(), context, domain.as_str()] {
            key.push(FIELD_SEPARATOR);
            key.push_str(field);
        }
        Self(fnv1a_hash_str_64(&key))
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The cache key form of this fingerprint: 16 lowercase hex digits.
    pub fn to_key(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:016x}", self.0)
    }
}

/// Collapse whitespace runs to a single space and trim the ends.
///
/// Control characters are dropped so they can never collide with the field
/// separator.
pub fn normalize_expression(expression: &str) -> String {
    expression
        .split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
