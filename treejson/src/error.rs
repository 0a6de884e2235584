// SPDX-License-Identifier: Apache-2.0

//! Error types for tokenizing and parsing.
//!
//! Failures form a flat taxonomy, not a hierarchy. The first error halts
//! the parse; nothing is retried and no partial tree survives.

use std::fmt;
use std::io;

/// Every way a tokenizer or grammar step can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A number was finalized in a state that cannot end one (`1.`, `2e`, `-`).
    UnexpectedTokenEnd,
    /// A character that can neither extend nor start a token.
    UnexpectedCharacter,
    /// End of input inside a string literal.
    StrUnexpectedEof,
    /// A raw control character inside a string literal.
    StrUnexpectedControl,
    /// A backslash escape other than `" \ / b f n r t u`.
    StrInvalidEscape,
    /// A non-hex digit inside a `\uXXXX` escape.
    StrInvalidUnicode,
    /// Input continued after the first complete value.
    TrailingGarbage,
    /// End of input where a value, key, or separator was required.
    UnexpectedEof,
    /// A bare identifier other than `true`, `false` or `null`.
    UnresolvedToken,
    /// A map key must be a string.
    ExpectedString,
    /// A `:` must follow a map key.
    ExpectedColon,
    /// After a map entry, only `,` or `}` may follow.
    ExpectedCommaOrClosingBrace,
    /// After an array item, only `,` or `]` may follow.
    ExpectedCommaOrClosingBracket,
}

impl ErrorKind {
    /// A short human-readable message, one per kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedTokenEnd => "Unexpected token end",
            ErrorKind::UnexpectedCharacter => "Unexpected character",
            ErrorKind::StrUnexpectedEof => "Unexpected EOF while parsing string",
            ErrorKind::StrUnexpectedControl => "Unexpected control character in string",
            ErrorKind::StrInvalidEscape => "Invalid escape sequence",
            ErrorKind::StrInvalidUnicode => "Invalid unicode sequence",
            ErrorKind::TrailingGarbage => "Trailing garbage at the end of file",
            ErrorKind::UnexpectedEof => "Unexpected EOF",
            ErrorKind::UnresolvedToken => "Unresolved token",
            ErrorKind::ExpectedString => "String expected",
            ErrorKind::ExpectedColon => "Colon ':' expected",
            ErrorKind::ExpectedCommaOrClosingBrace => "Comma ',' or closing brace '}' expected",
            ErrorKind::ExpectedCommaOrClosingBracket => {
                "Comma ',' or closing bracket ']' expected"
            }
        }
    }
}

/// A parse failure with the location of the offending character.
///
/// `line` starts at 1. `pos` counts characters consumed since the last
/// newline; the first character on a line is at `pos` 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: u32,
    pub pos: u32,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, pos {})", self.kind.message(), self.line, self.pos)
    }
}

impl std::error::Error for ParseError {}

/// Error returned by the file entry points, which can also fail on I/O
/// before any character is tokenized.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Parse(ParseError),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
        }
    }
}
