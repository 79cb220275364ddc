//! A flat lexical scan of LaTeX-style markup.
//!
//! The analyzer never builds an expression tree; it only needs to know
//! where commands, letters, operators and braces are.

/// A lexical token with its byte offset in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub offset: usize,
    pub kind: TokenKind<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// `\name`, stored without the backslash.
    Command(&'a str),
    /// `\{`, `\,` and other escaped non-letters.
    EscapedSymbol(char),
    Letter(char),
    /// A run of digits, possibly with one decimal point.
    Number(&'a str),
    Operator(char),
    OpenBrace,
    CloseBrace,
    Whitespace,
    Other(char),
}

/// Characters counted as operators.
pub const OPERATOR_CHARS: [char; 11] = ['+', '-', '*', '/', '=', '<', '>', '^', '_', '!', '|'];

/// Tokenize `input` in a single left-to-right pass.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            '\\' => match chars.peek().copied() {
                Some((start, next)) if next.is_ascii_alphabetic() => {
                    let mut end = start;
                    while let Some(&(i, ch)) = chars.peek() {
                        if !ch.is_ascii_alphabetic() {
                            break;
                        }
                        end = i + ch.len_utf8();
                        chars.next();
                    }
                    TokenKind::Command(&input[start..end])
                }
                Some((_, next)) => {
                    chars.next();
                    TokenKind::EscapedSymbol(next)
                }
                None => TokenKind::Other('\\'),
            },
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            c if c.is_ascii_digit() => {
                let mut end = offset + 1;
                let mut seen_point = false;
                while let Some(&(i, ch)) = chars.peek() {
                    let is_point = ch == '.' && !seen_point;
                    if !(ch.is_ascii_digit() || is_point) {
                        break;
                    }
                    seen_point |= is_point;
                    end = i + 1;
                    chars.next();
                }
                TokenKind::Number(&input[offset..end])
            }
            c if c.is_alphabetic() => TokenKind::Letter(c),
            c if c.is_whitespace() => TokenKind::Whitespace,
            c if OPERATOR_CHARS.contains(&c) => TokenKind::Operator(c),
            other => TokenKind::Other(other),
        };
        tokens.push(Token { offset, kind });
    }

    tokens
}

/// Names of every command in `tokens`, in order of appearance.
pub fn commands<'a>(tokens: &[Token<'a>]) -> impl Iterator<Item = &'a str> {
    tokens.iter().filter_map(|token| match token.kind {
        TokenKind::Command(name) => Some(name),
        _ => None,
    })
}
