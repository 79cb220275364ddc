//! Integration tests for output template parsing and rendering.

use mathspeak::parser::{CaptureTransform, GroupRef, ParseError, Segment, parse_template};

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_pure_literal() {
    let t = parse_template("one half").unwrap();
    assert_eq!(t.segments, vec![Segment::Literal("one half".into())]);
}

#[test]
fn test_empty_string() {
    let t = parse_template("").unwrap();
    assert_eq!(t.segments, vec![]);
}

#[test]
fn test_positional_placeholders() {
    let t = parse_template("{1} over {2}").unwrap();
    assert_eq!(
        t.segments,
        vec![
            Segment::Capture {
                transform: None,
                group: GroupRef::Index(1),
            },
            Segment::Literal(" over ".into()),
            Segment::Capture {
                transform: None,
                group: GroupRef::Index(2),
            },
        ]
    );
}

#[test]
fn test_named_placeholder() {
    let t = parse_template("the limit as {var} approaches {target}").unwrap();
    let groups: Vec<_> = t.groups().cloned().collect();
    assert_eq!(
        groups,
        vec![
            GroupRef::Name("var".into()),
            GroupRef::Name("target".into())
        ]
    );
}

#[test]
fn test_transforms() {
    let t = parse_template("the {@ord 1} root of {@num 2}").unwrap();
    match &t.segments[1] {
        Segment::Capture { transform, group } => {
            assert_eq!(*transform, Some(CaptureTransform::Ordinal));
            assert_eq!(*group, GroupRef::Index(1));
        }
        Segment::Literal(_) => panic!("expected capture"),
    }
    match &t.segments[3] {
        Segment::Capture { transform, .. } => {
            assert_eq!(*transform, Some(CaptureTransform::Number));
        }
        Segment::Literal(_) => panic!("expected capture"),
    }
}

#[test]
fn test_whitespace_inside_placeholder() {
    let t = parse_template("{ 1 }").unwrap();
    assert_eq!(t.groups().collect::<Vec<_>>(), vec![&GroupRef::Index(1)]);
}

#[test]
fn test_escaped_braces_merge_into_literal() {
    let t = parse_template("set {{{1}}}").unwrap();
    assert_eq!(
        t.segments,
        vec![
            Segment::Literal("set {".into()),
            Segment::Capture {
                transform: None,
                group: GroupRef::Index(1),
            },
            Segment::Literal("}".into()),
        ]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unclosed_placeholder_reports_position() {
    let err = parse_template("the {1 over").unwrap_err();
    let ParseError::Syntax { line, column, .. } = err;
    assert_eq!(line, 1);
    assert_eq!(column, 5);
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_template("a\nb }").unwrap_err();
    let ParseError::Syntax { line, column, .. } = err;
    assert_eq!((line, column), (2, 3));
}

#[test]
fn test_unknown_transform() {
    assert!(parse_template("{@roman 1}").is_err());
}

#[test]
fn test_empty_placeholder() {
    assert!(parse_template("{}").is_err());
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_resolves_groups() {
    let t = parse_template("{1} over {2}").unwrap();
    let rendered = t.render(|group| match group {
        GroupRef::Index(1) => Some("a"),
        GroupRef::Index(2) => Some("b"),
        _ => None,
    });
    assert_eq!(rendered, "a over b");
}

#[test]
fn test_render_missing_group_is_empty() {
    let t = parse_template("[{1}]").unwrap();
    assert_eq!(t.render(|_| None), "[]");
}

#[test]
fn test_render_wraps_transformed_captures() {
    let t = parse_template("the {@ord 1} root").unwrap();
    assert_eq!(t.render(|_| Some("3")), "the #ord(3) root");
}
