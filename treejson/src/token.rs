// SPDX-License-Identifier: Apache-2.0

//! Lexical units handed from the tokenizer to the parser.

/// A resolved token.
///
/// String-carrying variants own their buffer; matching the buffer out of
/// the variant transfers ownership without copying, so a scanned string
/// can become a value's backing storage directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// End of input (or an embedded NUL byte).
    Eof,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A string literal with escapes already decoded.
    Str(Vec<u8>),
    Int(i32),
    Float(f32),
    Bool(bool),
    Null,
    /// A bare identifier other than `true`, `false` or `null`. The parser
    /// rejects it; JSON has no other valid symbols.
    Symbol(Vec<u8>),
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}
