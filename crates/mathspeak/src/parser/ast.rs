//! Public AST types for rule output templates.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A parsed output template containing segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    pub segments: Vec<Segment>,
}

/// A segment within an output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal speech text.
    Literal(String),
    /// A placeholder: `{1}`, `{name}` or `{@num 1}`.
    Capture {
        transform: Option<CaptureTransform>,
        group: GroupRef,
    },
}

/// Reference to a capture group of the rule's match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupRef {
    /// Positional group. `0` is the whole match.
    Index(usize),
    /// Named group, `(?P<name>...)` in the pattern.
    Name(String),
}

impl Display for GroupRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GroupRef::Index(index) => write!(f, "{{{index}}}"),
            GroupRef::Name(name) => write!(f, "{{{name}}}"),
        }
    }
}

/// Marks captured text for conversion by the post-processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTransform {
    /// `@num`: spell the captured numeral as words.
    Number,
    /// `@ord`: spell the captured numeral as an ordinal.
    Ordinal,
}

impl CaptureTransform {
    /// Marker name understood by the post-processor.
    pub fn marker(&self) -> &'static str {
        match self {
            CaptureTransform::Number => "num",
            CaptureTransform::Ordinal => "ord",
        }
    }
}

impl OutputTemplate {
    /// Every capture group referenced by this template, in order of appearance.
    pub fn groups(&self) -> impl Iterator<Item = &GroupRef> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Capture { group, .. } => Some(group),
            Segment::Literal(_) => None,
        })
    }

    /// Render the template, resolving each placeholder through `lookup`.
    ///
    /// A group that did not participate in the match renders as empty text.
    /// Transformed captures are wrapped in a `#num(...)` or `#ord(...)`
    /// marker for the post-processor.
    pub fn render<'t>(&self, lookup: impl Fn(&GroupRef) -> Option<&'t str>) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Capture { transform, group } => {
                    let captured = lookup(group).unwrap_or_default();
                    match transform {
                        Some(transform) => {
                            output.push('#');
                            output.push_str(transform.marker());
                            output.push('(');
                            output.push_str(captured);
                            output.push(')');
                        }
                        None => output.push_str(captured),
                    }
                }
            }
        }
        output
    }
}
