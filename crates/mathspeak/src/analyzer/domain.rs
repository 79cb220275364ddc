//! Domain detection by marker counting.

use crate::analyzer::tokens::{Token, commands};
use crate::types::Domain;

/// Characteristic markers of one domain.
struct DomainMarkers {
    domain: Domain,
    /// Command names, matched exactly against `\name` tokens.
    commands: &'static [&'static str],
    /// Raw substrings, counted by non-overlapping occurrence.
    substrings: &'static [&'static str],
}

const MARKERS: [DomainMarkers; 9] = [
    DomainMarkers {
        domain: Domain::Calculus,
        commands: &[
            "int", "iint", "iiint", "oint", "partial", "lim", "nabla", "prime", "sum", "infty",
        ],
        substrings: &["\\frac{d", "\\dfrac{d", "dx", "dy", "dt", "dz"],
    },
    DomainMarkers {
        domain: Domain::LinearAlgebra,
        commands: &["det", "vec", "mathbf", "otimes", "top", "dagger", "rank", "ker", "tr"],
        substrings: &[
            "\\begin{matrix}",
            "\\begin{pmatrix}",
            "\\begin{bmatrix}",
            "\\begin{vmatrix}",
            "^T",
            "^{T}",
        ],
    },
    DomainMarkers {
        domain: Domain::Statistics,
        commands: &["mu", "sigma", "bar", "binom", "Pr", "sim", "Var", "Cov"],
        substrings: &["P(", "E[", "\\mathrm{Var}", "\\operatorname{Var}", "\\operatorname{Cov}"],
    },
    DomainMarkers {
        domain: Domain::Trigonometry,
        commands: &[
            "sin", "cos", "tan", "sec", "csc", "cot", "arcsin", "arccos", "arctan", "sinh",
            "cosh", "tanh", "theta",
        ],
        substrings: &[],
    },
    DomainMarkers {
        domain: Domain::SetTheory,
        commands: &[
            "in", "notin", "subset", "subseteq", "supset", "supseteq", "cup", "cap", "emptyset",
            "varnothing", "setminus", "mathbb",
        ],
        substrings: &[],
    },
    DomainMarkers {
        domain: Domain::Logic,
        commands: &[
            "forall", "exists", "neg", "land", "lor", "implies", "iff", "Rightarrow",
            "Leftrightarrow", "vdash", "models",
        ],
        substrings: &[],
    },
    DomainMarkers {
        domain: Domain::NumberTheory,
        commands: &["gcd", "lcm", "mod", "bmod", "pmod", "equiv", "mid", "nmid", "lfloor"],
        substrings: &[],
    },
    DomainMarkers {
        domain: Domain::Geometry,
        commands: &["angle", "triangle", "perp", "parallel", "cong", "overline", "degree"],
        substrings: &["^\\circ"],
    },
    DomainMarkers {
        domain: Domain::Algebra,
        commands: &["sqrt", "pm", "mp", "log", "ln", "exp", "cdot", "times", "div", "prod"],
        substrings: &["^2", "^3", "^{"],
    },
];

/// Score every domain and return the winner.
///
/// The domain with the highest non-zero score wins. Ties go to the domain
/// listed first in [`Domain::DETECTION_ORDER`]. When nothing scores, the
/// expression is general.
pub fn detect_domain(raw: &str, tokens: &[Token<'_>]) -> Domain {
    let scores = domain_scores(raw, tokens);
    let mut best = (Domain::General, 0);
    for domain in Domain::DETECTION_ORDER {
        let score = scores
            .iter()
            .find(|(d, _)| *d == domain)
            .map_or(0, |(_, s)| *s);
        if score > best.1 {
            best = (domain, score);
        }
    }
    best.0
}

/// Marker counts for every scored domain, in detection order.
pub fn domain_scores(raw: &str, tokens: &[Token<'_>]) -> Vec<(Domain, usize)> {
    let names: Vec<&str> = commands(tokens).collect();
    Domain::DETECTION_ORDER
        .iter()
        .filter_map(|domain| MARKERS.iter().find(|m| m.domain == *domain))
        .map(|markers| {
            let command_hits = names
                .iter()
                .filter(|name| markers.commands.contains(name))
                .count();
            let substring_hits: usize = markers
                .substrings
                .iter()
                .map(|needle| raw.matches(needle).count())
                .sum();
            (markers.domain, command_hits + substring_hits)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tokens::tokenize;

    fn detect(raw: &str) -> Domain {
        detect_domain(raw, &tokenize(raw))
    }

    #[test]
    fn every_scored_domain_has_markers() {
        for domain in Domain::DETECTION_ORDER {
            assert!(MARKERS.iter().any(|m| m.domain == domain), "{domain}");
        }
    }

    #[test]
    fn in_does_not_match_int() {
        assert_eq!(detect(r"\int x"), Domain::Calculus);
        assert_eq!(detect(r"x \in A"), Domain::SetTheory);
    }

    #[test]
    fn nothing_scores_is_general() {
        assert_eq!(detect("1 + 1"), Domain::General);
    }

    #[test]
    fn tie_goes_to_earlier_domain() {
        // one calculus marker (\lim) and one trigonometry marker (\sin)
        assert_eq!(detect(r"\lim \sin"), Domain::Calculus);
    }
}
