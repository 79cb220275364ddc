//! Output template parser using winnow.
//!
//! Handles:
//! - Literal text segments
//! - Placeholders: `{1}`, `{name}`, `{0}` for the whole match
//! - Transforms on placeholders: `{@num 1}`, `{@ord n}`
//! - Escape sequences: `{{` and `}}`

use super::ast::*;
use super::error::ParseError;
use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{none_of, one_of, take_while};

/// Parse an output template string into an AST.
pub fn parse_template(input: &str) -> Result<OutputTemplate, ParseError> {
    let mut rest = input;
    let parsed = template(&mut rest);
    match (parsed, rest.chars().next()) {
        (Ok(template), None) => Ok(template),
        (Ok(_), Some(c)) => Err(syntax_error(
            input,
            rest,
            format!("unbalanced '{c}' in template"),
        )),
        (Err(e), _) => Err(syntax_error(
            input,
            rest,
            format!("malformed placeholder: {e}"),
        )),
    }
}

/// Build a syntax error located where `rest` begins inside `input`.
fn syntax_error(input: &str, rest: &str, message: String) -> ParseError {
    let offset = input.len() - rest.len();
    let before = &input[..offset];
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    ParseError::Syntax {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
        message,
    }
}

/// Parse a complete template into segments, joining runs of literal text.
fn template(input: &mut &str) -> ModalResult<OutputTemplate> {
    let parts: Vec<Segment> = repeat(0.., segment).parse_next(input)?;
    let segments = parts.into_iter().fold(Vec::new(), |mut joined, part| {
        match (joined.last_mut(), part) {
            (Some(Segment::Literal(text)), Segment::Literal(more)) => text.push_str(&more),
            (_, part) => joined.push(part),
        }
        joined
    });
    Ok(OutputTemplate { segments })
}

/// Parse a single segment (escape, placeholder, or literal).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((escape_sequence, placeholder, literal_char)).parse_next(input)
}

/// Parse escape sequences: {{ -> {, }} -> }
fn escape_sequence(input: &mut &str) -> ModalResult<Segment> {
    alt((
        "{{".value(Segment::Literal("{".to_string())),
        "}}".value(Segment::Literal("}".to_string())),
    ))
    .parse_next(input)
}

/// Parse a single literal character (not { or }).
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    none_of(['{', '}'])
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse a placeholder: { transform? group }
fn placeholder(input: &mut &str) -> ModalResult<Segment> {
    delimited('{', placeholder_content, '}').parse_next(input)
}

fn placeholder_content(input: &mut &str) -> ModalResult<Segment> {
    ws(input)?;
    let transform = opt(terminated(transform, ws)).parse_next(input)?;
    let group = group_ref(input)?;
    ws(input)?;
    Ok(Segment::Capture { transform, group })
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Parse a transform: @num or @ord
fn transform(input: &mut &str) -> ModalResult<CaptureTransform> {
    ('@', identifier)
        .verify_map(|(_, name)| match name {
            "num" => Some(CaptureTransform::Number),
            "ord" => Some(CaptureTransform::Ordinal),
            _ => None,
        })
        .parse_next(input)
}

/// Parse a group reference: positional index or group name.
fn group_ref(input: &mut &str) -> ModalResult<GroupRef> {
    alt((
        digit1.try_map(str::parse::<usize>).map(GroupRef::Index),
        identifier.map(|name: &str| GroupRef::Name(name.to_string())),
    ))
    .parse_next(input)
}

/// Parse an identifier: letter or underscore, then alphanumerics/underscores.
fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}
