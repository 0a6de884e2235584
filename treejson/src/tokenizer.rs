// SPDX-License-Identifier: Apache-2.0

//! Character-level finite-state tokenizer.
//!
//! Tokens are emitted on boundaries: a character that cannot extend the
//! token in progress finalizes it, the finalized token is returned, and the
//! boundary character's own token is held over to the next call. Strings
//! are the exception; the closing quote emits the string in the same call.
//! End of input finalizes any pending token first, and [`Token::Eof`]
//! itself is returned on the call after that.

use log::debug;

use crate::error::{ErrorKind, ParseError};
use crate::source::Source;
use crate::token::Token;

/// Initial capacity of string, symbol and number scratch buffers.
const STRING_INITIAL_CAPACITY: usize = 8;

/// Sub-states of a string literal in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Str {
    Open,
    Backslash,
    Unicode0,
    Unicode1,
    Unicode2,
    Unicode3,
}

/// Sub-states of a number in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Sign,
    LeadingZero,
    Integer,
    DecimalPoint,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

/// The two-slot emit buffer: whatever is in progress, held until a
/// boundary character finalizes it.
#[derive(Debug)]
enum Partial {
    /// Nothing in progress (start of input, or right after whitespace).
    None,
    /// End of input was observed; the next call returns [`Token::Eof`].
    Eof,
    /// A complete single-character token waiting for its boundary.
    Ready(Token),
    Number { buf: String, state: Num },
    Symbol { buf: Vec<u8> },
    Str { buf: Vec<u8>, state: Str, code: u16 },
}

/// Pulls characters from a [`Source`] and produces [`Token`]s.
pub struct Tokenizer<S> {
    source: S,
    line: u32,
    pos: u32,
    partial: Partial,
}

fn is_symbol_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_symbol_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn hex_value(c: u8) -> Option<u16> {
    match c {
        b'0'..=b'9' => Some(u16::from(c - b'0')),
        b'a'..=b'f' => Some(u16::from(c - b'a') + 10),
        b'A'..=b'F' => Some(u16::from(c - b'A') + 10),
        _ => None,
    }
}

/// Append the UTF-8 encoding of a BMP code point.
///
/// Surrogate halves are encoded as-is, producing byte sequences that are
/// not valid UTF-8; code points above the BMP cannot be expressed at all.
/// This is a documented limitation of the `\uXXXX` decoder.
fn push_utf8(buf: &mut Vec<u8>, code: u16) {
    let u = u32::from(code);
    if u < 0x80 {
        buf.push(u as u8);
    } else if u < 0x800 {
        buf.push((((u >> 6) & 0x1f) as u8) | 0xc0);
        buf.push(((u & 0x3f) as u8) | 0x80);
    } else {
        buf.push((((u >> 12) & 0x0f) as u8) | 0xe0);
        buf.push((((u >> 6) & 0x3f) as u8) | 0x80);
        buf.push(((u & 0x3f) as u8) | 0x80);
    }
}

impl<S: Source> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            line: 1,
            pos: 0,
            partial: Partial::None,
        }
    }

    /// Current line, starting at 1.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Characters consumed since the last newline.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Build an error at the current position.
    pub(crate) fn error(&self, kind: ErrorKind) -> ParseError {
        debug!("error {:?} at {}:{}", kind, self.line, self.pos);
        ParseError {
            kind,
            line: self.line,
            pos: self.pos,
        }
    }

    /// Find the next token.
    ///
    /// Characters are pulled until a complete token can be returned. The
    /// first error halts the scan; the in-progress token is discarded.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        // EOF observed on a previous call is emitted now.
        if let Partial::Eof = self.partial {
            self.partial = Partial::None;
            return Ok(Token::Eof);
        }

        loop {
            let c = self.source.next_byte();
            self.pos += 1;

            // Inside a string every character goes through the string
            // machine, including the ones that are structural outside.
            if let Partial::Str { .. } = self.partial {
                if let Some(token) = self.scan_string(c)? {
                    return Ok(token);
                }
                continue;
            }

            match c {
                // An embedded NUL terminates input exactly like EOF.
                None | Some(0) => {
                    let pending = self.finish_partial()?;
                    self.partial = Partial::Eof;
                    return Ok(pending.unwrap_or(Token::Eof));
                }
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\x0c') => {
                    if let Some(token) = self.finish_partial()? {
                        return Ok(token);
                    }
                }
                Some(b'\n') => {
                    let pending = self.finish_partial()?;
                    self.pos = 0;
                    self.line += 1;
                    if let Some(token) = pending {
                        return Ok(token);
                    }
                }
                Some(b'{') => {
                    if let Some(token) = self.boundary(Token::BraceOpen)? {
                        return Ok(token);
                    }
                }
                Some(b'}') => {
                    if let Some(token) = self.boundary(Token::BraceClose)? {
                        return Ok(token);
                    }
                }
                Some(b'[') => {
                    if let Some(token) = self.boundary(Token::BracketOpen)? {
                        return Ok(token);
                    }
                }
                Some(b']') => {
                    if let Some(token) = self.boundary(Token::BracketClose)? {
                        return Ok(token);
                    }
                }
                Some(b':') => {
                    if let Some(token) = self.boundary(Token::Colon)? {
                        return Ok(token);
                    }
                }
                Some(b',') => {
                    if let Some(token) = self.boundary(Token::Comma)? {
                        return Ok(token);
                    }
                }
                Some(b'"') => {
                    let pending = self.finish_partial()?;
                    self.partial = Partial::Str {
                        buf: Vec::with_capacity(STRING_INITIAL_CAPACITY),
                        state: Str::Open,
                        code: 0,
                    };
                    if let Some(token) = pending {
                        return Ok(token);
                    }
                }
                Some(c) => {
                    if let Partial::Number { .. } = self.partial {
                        self.scan_number(c)?;
                    } else if let Partial::Symbol { buf } = &mut self.partial {
                        if is_symbol_char(c) {
                            buf.push(c);
                        } else {
                            self.partial = Partial::None;
                            return Err(self.error(ErrorKind::UnexpectedCharacter));
                        }
                    } else {
                        let pending = self.finish_partial()?;
                        self.start_token(c)?;
                        if let Some(token) = pending {
                            return Ok(token);
                        }
                    }
                }
            }
        }
    }

    /// Stage a single-character token, returning whatever it finalized.
    fn boundary(&mut self, token: Token) -> Result<Option<Token>, ParseError> {
        let pending = self.finish_partial()?;
        self.partial = Partial::Ready(token);
        Ok(pending)
    }

    /// Begin a number or symbol at a character that starts one.
    fn start_token(&mut self, c: u8) -> Result<(), ParseError> {
        let mut buf = String::with_capacity(STRING_INITIAL_CAPACITY);
        if c == b'-' {
            buf.push('-');
            self.partial = Partial::Number {
                buf,
                state: Num::Sign,
            };
        } else if c.is_ascii_digit() {
            buf.push(char::from(c));
            self.partial = Partial::Number {
                buf,
                state: if c == b'0' {
                    Num::LeadingZero
                } else {
                    Num::Integer
                },
            };
        } else if is_symbol_start(c) {
            let mut buf = Vec::with_capacity(STRING_INITIAL_CAPACITY);
            buf.push(c);
            self.partial = Partial::Symbol { buf };
        } else {
            return Err(self.error(ErrorKind::UnexpectedCharacter));
        }
        Ok(())
    }

    /// Finalize whatever is in progress, if anything.
    ///
    /// Strings never get here; their closing quote emits them inside
    /// [`Self::scan_string`].
    fn finish_partial(&mut self) -> Result<Option<Token>, ParseError> {
        match std::mem::replace(&mut self.partial, Partial::None) {
            Partial::None | Partial::Eof | Partial::Str { .. } => Ok(None),
            Partial::Ready(token) => Ok(Some(token)),
            Partial::Number { buf, state } => self.finish_number(buf, state).map(Some),
            Partial::Symbol { buf } => {
                let token = if buf.as_slice() == b"true" {
                    Token::Bool(true)
                } else if buf.as_slice() == b"false" {
                    Token::Bool(false)
                } else if buf.as_slice() == b"null" {
                    Token::Null
                } else {
                    Token::Symbol(buf)
                };
                Ok(Some(token))
            }
        }
    }

    /// Classify and convert an accumulated digit buffer.
    ///
    /// A decimal point or exponent marker makes the number a float;
    /// otherwise it is a 32-bit integer.
    fn finish_number(&self, buf: String, state: Num) -> Result<Token, ParseError> {
        match state {
            Num::Sign | Num::DecimalPoint | Num::Exponent | Num::ExponentSign => {
                Err(self.error(ErrorKind::UnexpectedTokenEnd))
            }
            Num::LeadingZero | Num::Integer => buf
                .parse::<i32>()
                .map(Token::Int)
                .map_err(|_| self.error(ErrorKind::UnexpectedTokenEnd)),
            Num::Fraction | Num::ExponentDigits => buf
                .parse::<f32>()
                .map(Token::Float)
                .map_err(|_| self.error(ErrorKind::UnexpectedTokenEnd)),
        }
    }

    /// One transition of the number machine.
    fn scan_number(&mut self, c: u8) -> Result<(), ParseError> {
        let (buf, state) = match &mut self.partial {
            Partial::Number { buf, state } => (buf, state),
            _ => return Ok(()),
        };
        match *state {
            Num::Sign => match c {
                b'0' => {
                    buf.push('0');
                    *state = Num::LeadingZero;
                }
                b'1'..=b'9' => {
                    buf.push(char::from(c));
                    *state = Num::Integer;
                }
                _ => return self.fail_number(),
            },
            Num::LeadingZero => match c {
                b'.' => {
                    buf.push('.');
                    *state = Num::DecimalPoint;
                }
                b'e' | b'E' => {
                    buf.push(char::from(c));
                    *state = Num::Exponent;
                }
                _ => return self.fail_number(),
            },
            Num::Integer => match c {
                b'.' => {
                    buf.push('.');
                    *state = Num::DecimalPoint;
                }
                b'e' | b'E' => {
                    buf.push(char::from(c));
                    *state = Num::Exponent;
                }
                b'0'..=b'9' => buf.push(char::from(c)),
                _ => return self.fail_number(),
            },
            Num::DecimalPoint => match c {
                b'0'..=b'9' => {
                    buf.push(char::from(c));
                    *state = Num::Fraction;
                }
                _ => return self.fail_number(),
            },
            Num::Fraction => match c {
                b'0'..=b'9' => buf.push(char::from(c)),
                b'e' | b'E' => {
                    buf.push(char::from(c));
                    *state = Num::Exponent;
                }
                _ => return self.fail_number(),
            },
            Num::Exponent => match c {
                b'+' | b'-' => {
                    buf.push(char::from(c));
                    *state = Num::ExponentSign;
                }
                b'0'..=b'9' => {
                    buf.push(char::from(c));
                    *state = Num::ExponentDigits;
                }
                _ => return self.fail_number(),
            },
            Num::ExponentSign => match c {
                b'0'..=b'9' => {
                    buf.push(char::from(c));
                    *state = Num::ExponentDigits;
                }
                _ => return self.fail_number(),
            },
            Num::ExponentDigits => match c {
                b'0'..=b'9' => buf.push(char::from(c)),
                _ => return self.fail_number(),
            },
        }
        Ok(())
    }

    fn fail_number(&mut self) -> Result<(), ParseError> {
        self.partial = Partial::None;
        Err(self.error(ErrorKind::UnexpectedCharacter))
    }

    /// One transition of the string machine.
    ///
    /// Returns the finished string token when the closing quote is seen.
    fn scan_string(&mut self, c: Option<u8>) -> Result<Option<Token>, ParseError> {
        let c = match c {
            None | Some(0) => {
                self.partial = Partial::None;
                return Err(self.error(ErrorKind::StrUnexpectedEof));
            }
            Some(c) => c,
        };
        if matches!(c, b'\n' | b'\r' | b'\t' | b'\x0c' | b'\x08') {
            self.partial = Partial::None;
            return Err(self.error(ErrorKind::StrUnexpectedControl));
        }

        let (buf, state, code) = match &mut self.partial {
            Partial::Str { buf, state, code } => (buf, state, code),
            _ => return Ok(None),
        };
        match *state {
            Str::Open => match c {
                b'\\' => *state = Str::Backslash,
                b'"' => {
                    if let Partial::Str { buf, .. } =
                        std::mem::replace(&mut self.partial, Partial::None)
                    {
                        return Ok(Some(Token::Str(buf)));
                    }
                }
                _ => buf.push(c),
            },
            Str::Backslash => {
                let literal = match c {
                    b'"' => Some(b'"'),
                    b'\\' => Some(b'\\'),
                    b'/' => Some(b'/'),
                    b'b' => Some(0x08),
                    b'f' => Some(0x0c),
                    b'n' => Some(b'\n'),
                    b'r' => Some(b'\r'),
                    b't' => Some(b'\t'),
                    b'u' => None,
                    _ => {
                        self.partial = Partial::None;
                        return Err(self.error(ErrorKind::StrInvalidEscape));
                    }
                };
                match literal {
                    Some(byte) => {
                        buf.push(byte);
                        *state = Str::Open;
                    }
                    None => {
                        *code = 0;
                        *state = Str::Unicode0;
                    }
                }
            }
            Str::Unicode0 => match hex_value(c) {
                Some(hex) => {
                    *code |= hex << 12;
                    *state = Str::Unicode1;
                }
                None => {
                    self.partial = Partial::None;
                    return Err(self.error(ErrorKind::StrInvalidUnicode));
                }
            },
            Str::Unicode1 => match hex_value(c) {
                Some(hex) => {
                    *code |= hex << 8;
                    *state = Str::Unicode2;
                }
                None => {
                    self.partial = Partial::None;
                    return Err(self.error(ErrorKind::StrInvalidUnicode));
                }
            },
            Str::Unicode2 => match hex_value(c) {
                Some(hex) => {
                    *code |= hex << 4;
                    *state = Str::Unicode3;
                }
                None => {
                    self.partial = Partial::None;
                    return Err(self.error(ErrorKind::StrInvalidUnicode));
                }
            },
            Str::Unicode3 => match hex_value(c) {
                Some(hex) => {
                    let code = *code | hex;
                    push_utf8(buf, code);
                    *state = Str::Open;
                }
                None => {
                    self.partial = Partial::None;
                    return Err(self.error(ErrorKind::StrInvalidUnicode));
                }
            },
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn tokenizer(text: &str) -> Tokenizer<StrSource<'_>> {
        Tokenizer::new(StrSource::new(text))
    }

    fn all_tokens(text: &str) -> Vec<Token> {
        let mut t = tokenizer(text);
        let mut tokens = Vec::new();
        loop {
            let token = t.next_token().expect("unexpected scan error");
            let eof = token.is_eof();
            tokens.push(token);
            if eof {
                return tokens;
            }
        }
    }

    fn first_error(text: &str) -> ParseError {
        let mut t = tokenizer(text);
        loop {
            match t.next_token() {
                Ok(token) if token.is_eof() => panic!("scan succeeded for {text:?}"),
                Ok(_) => continue,
                Err(err) => return err,
            }
        }
    }

    #[test_log::test]
    fn scalar_literals() {
        assert_eq!(all_tokens("true"), vec![Token::Bool(true), Token::Eof]);
        assert_eq!(all_tokens("false"), vec![Token::Bool(false), Token::Eof]);
        assert_eq!(all_tokens("null"), vec![Token::Null, Token::Eof]);
        assert_eq!(all_tokens("42"), vec![Token::Int(42), Token::Eof]);
        assert_eq!(all_tokens("-17"), vec![Token::Int(-17), Token::Eof]);
        assert_eq!(all_tokens("0"), vec![Token::Int(0), Token::Eof]);
        assert_eq!(all_tokens("1.5"), vec![Token::Float(1.5), Token::Eof]);
        assert_eq!(all_tokens("-0.25"), vec![Token::Float(-0.25), Token::Eof]);
        assert_eq!(all_tokens("2e3"), vec![Token::Float(2000.0), Token::Eof]);
        assert_eq!(all_tokens("2.5e-2"), vec![Token::Float(0.025), Token::Eof]);
        assert_eq!(all_tokens("0E2"), vec![Token::Float(0.0), Token::Eof]);
    }

    #[test]
    fn punctuation_stream() {
        assert_eq!(
            all_tokens("{}[]:,"),
            vec![
                Token::BraceOpen,
                Token::BraceClose,
                Token::BracketOpen,
                Token::BracketClose,
                Token::Colon,
                Token::Comma,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn emit_on_boundary_carries_next_token_over() {
        // The '[' is only returned once '1' begins; '1' is only returned
        // once ']' begins; ']' is finalized by end of input.
        let mut t = tokenizer("[1]");
        assert_eq!(t.next_token().unwrap(), Token::BracketOpen);
        assert_eq!(t.next_token().unwrap(), Token::Int(1));
        assert_eq!(t.next_token().unwrap(), Token::BracketClose);
        assert_eq!(t.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn eof_is_returned_on_the_call_after_a_pending_token() {
        let mut t = tokenizer("7");
        assert_eq!(t.next_token().unwrap(), Token::Int(7));
        assert_eq!(t.next_token().unwrap(), Token::Eof);
        // And stays at EOF afterwards.
        assert_eq!(t.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn whitespace_separates_tokens() {
        assert_eq!(
            all_tokens(" \t\r\x0c 1 \n 2 "),
            vec![Token::Int(1), Token::Int(2), Token::Eof]
        );
    }

    #[test]
    fn strings_are_emitted_at_the_closing_quote() {
        assert_eq!(
            all_tokens("\"hello\""),
            vec![Token::Str(b"hello".to_vec()), Token::Eof]
        );
        assert_eq!(
            all_tokens("\"\""),
            vec![Token::Str(Vec::new()), Token::Eof]
        );
    }

    #[test]
    fn string_escapes_decode() {
        assert_eq!(
            all_tokens(r#""a\"b\\c\/d\be\ff\ng\rh\ti""#),
            vec![
                Token::Str(b"a\"b\\c/d\x08e\x0cf\ng\rh\ti".to_vec()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn unicode_escape_one_byte() {
        assert_eq!(
            all_tokens(r#""\u0041""#),
            vec![Token::Str(b"A".to_vec()), Token::Eof]
        );
    }

    #[test]
    fn unicode_escape_two_bytes() {
        // U+00E9 'e acute' -> C3 A9
        assert_eq!(
            all_tokens(r#""\u00E9""#),
            vec![Token::Str(vec![0xc3, 0xa9]), Token::Eof]
        );
    }

    #[test]
    fn unicode_escape_three_bytes() {
        // U+20AC euro sign -> E2 82 AC
        assert_eq!(
            all_tokens(r#""\u20AC""#),
            vec![Token::Str(vec![0xe2, 0x82, 0xac]), Token::Eof]
        );
    }

    #[test]
    fn multibyte_input_passes_through_untouched() {
        // Raw UTF-8 in the input is copied byte for byte.
        assert_eq!(
            all_tokens("\"é€\""),
            vec![
                Token::Str("é€".as_bytes().to_vec()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn surrogate_halves_encode_verbatim() {
        // No pairing: U+D83D comes out as its own three bytes.
        assert_eq!(
            all_tokens(r#""\uD83D""#),
            vec![Token::Str(vec![0xed, 0xa0, 0xbd]), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_reports_eof() {
        assert_eq!(first_error("\"abc").kind, ErrorKind::StrUnexpectedEof);
    }

    #[test]
    fn nul_inside_string_reports_eof() {
        let mut t = Tokenizer::new(StrSource::from_bytes(b"\"ab\0cd\""));
        assert_eq!(t.next_token().unwrap_err().kind, ErrorKind::StrUnexpectedEof);
    }

    #[test]
    fn raw_control_characters_are_rejected_in_strings() {
        for text in ["\"a\nb\"", "\"a\rb\"", "\"a\tb\"", "\"a\x0cb\"", "\"a\x08b\""] {
            assert_eq!(
                first_error(text).kind,
                ErrorKind::StrUnexpectedControl,
                "input {text:?}"
            );
        }
    }

    #[test]
    fn invalid_escape_is_rejected() {
        assert_eq!(first_error(r#""\x""#).kind, ErrorKind::StrInvalidEscape);
    }

    #[test]
    fn invalid_unicode_digit_is_rejected_at_every_stage() {
        for text in [r#""\uZ000""#, r#""\u0Z00""#, r#""\u00Z0""#, r#""\u000Z""#] {
            assert_eq!(
                first_error(text).kind,
                ErrorKind::StrInvalidUnicode,
                "input {text:?}"
            );
        }
    }

    #[test]
    fn string_error_discards_the_token_in_progress() {
        // '!' is not a hex digit; the broken literal is dropped and
        // scanning resumes from a clean state.
        let mut t = Tokenizer::new(StrSource::from_bytes(b"\"\\u!7"));
        assert_eq!(t.next_token().unwrap_err().kind, ErrorKind::StrInvalidUnicode);
        assert_eq!(t.next_token().unwrap(), Token::Int(7));
        assert_eq!(t.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn malformed_numbers_at_end_of_input() {
        for text in ["-", "1.", "2e", "2e+"] {
            assert_eq!(
                first_error(text).kind,
                ErrorKind::UnexpectedTokenEnd,
                "input {text:?}"
            );
        }
    }

    #[test]
    fn malformed_number_continuations() {
        for text in ["01", "0x1", "1.e5", "1ee5", "2e++1", "--1", "-a"] {
            assert_eq!(
                first_error(text).kind,
                ErrorKind::UnexpectedCharacter,
                "input {text:?}"
            );
        }
    }

    #[test]
    fn integer_overflow_is_a_token_error() {
        assert_eq!(first_error("9999999999").kind, ErrorKind::UnexpectedTokenEnd);
    }

    #[test]
    fn unknown_symbols_are_surfaced_unresolved() {
        assert_eq!(
            all_tokens("flag"),
            vec![Token::Symbol(b"flag".to_vec()), Token::Eof]
        );
        assert_eq!(
            all_tokens("_x1"),
            vec![Token::Symbol(b"_x1".to_vec()), Token::Eof]
        );
    }

    #[test]
    fn symbol_followed_by_invalid_character() {
        assert_eq!(first_error("tru-e").kind, ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn stray_character_is_rejected() {
        assert_eq!(first_error("@").kind, ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn nul_ends_input_mid_stream() {
        let mut t = Tokenizer::new(StrSource::from_bytes(b"12\034"));
        assert_eq!(t.next_token().unwrap(), Token::Int(12));
        assert_eq!(t.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn error_position_tracks_lines_and_columns() {
        let err = first_error("[1,\n 2,\n @]");
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
        assert_eq!(err.line, 3);
        assert_eq!(err.pos, 2);
    }

    #[test]
    fn error_position_on_first_line() {
        let err = first_error("123x");
        assert_eq!(err.line, 1);
        assert_eq!(err.pos, 4);
    }
}
