// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser assembling tokens into a value tree.
//!
//! One nonterminal per value kind, mutually recursive with the array and
//! map element parsers. Recursion depth equals document nesting depth and
//! is bounded only by the call stack. The grammar requires at least one
//! element inside `[]` and one entry inside `{}`; empty containers are
//! rejected, matching the reference behavior.
//!
//! Cleanup on failure is automatic: every partially built value (and
//! every taken key) is owned by some stack frame, so unwinding the `?`
//! chain drops the whole construction site.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::rc::Rc;

use log::trace;

use crate::error::{Error, ErrorKind, ParseError};
use crate::source::{IoSource, Source, StrSource};
use crate::token::Token;
use crate::tokenizer::Tokenizer;
use crate::value::Value;
use crate::{Array, Map};

/// Default read buffer for [`parse_file`].
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Buffering mode for the file entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Read through a buffer of the given capacity.
    Buffered(usize),
    /// One read syscall per character.
    Unbuffered,
}

/// Parse a JSON document from a string.
///
/// An embedded NUL byte ends the input early, exactly like running out of
/// text.
pub fn parse_str(text: &str) -> Result<Value, ParseError> {
    parse_source(StrSource::new(text))
}

/// Parse a JSON document from an open stream.
pub fn parse_reader<R: Read>(reader: R) -> Result<Value, ParseError> {
    parse_source(IoSource::new(reader))
}

/// Parse a JSON file, buffered with [`DEFAULT_BUFFER_SIZE`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Value, Error> {
    parse_file_with(path, FileMode::Buffered(DEFAULT_BUFFER_SIZE))
}

/// Parse a JSON file with an explicit buffering mode.
pub fn parse_file_with<P: AsRef<Path>>(path: P, mode: FileMode) -> Result<Value, Error> {
    let file = File::open(path)?;
    let value = match mode {
        FileMode::Buffered(capacity) => {
            parse_reader(BufReader::with_capacity(capacity.max(1), file))
        }
        FileMode::Unbuffered => parse_reader(file),
    }?;
    Ok(value)
}

/// Parse exactly one JSON value followed by end of input.
pub fn parse_source<S: Source>(source: S) -> Result<Value, ParseError> {
    let mut tokenizer = Tokenizer::new(source);
    let value = parse_value(&mut tokenizer)?;
    trace!("value parsed, expecting end of input");
    // Anything but a clean EOF here is trailing garbage, including input
    // that does not even tokenize.
    match tokenizer.next_token() {
        Ok(Token::Eof) => Ok(value),
        Ok(_) | Err(_) => Err(tokenizer.error(ErrorKind::TrailingGarbage)),
    }
}

fn parse_value<S: Source>(tokenizer: &mut Tokenizer<S>) -> Result<Value, ParseError> {
    match tokenizer.next_token()? {
        Token::Null => Ok(Value::Null),
        Token::Int(v) => Ok(Value::Int(v)),
        Token::Bool(v) => Ok(Value::Bool(v)),
        Token::Float(v) => Ok(Value::Float(v)),
        // The scanned buffer becomes the value's storage; no copy.
        Token::Str(buf) => Ok(Value::Str(buf)),
        Token::BraceOpen => parse_map(tokenizer),
        Token::BracketOpen => parse_array(tokenizer),
        Token::Eof => Err(tokenizer.error(ErrorKind::UnexpectedEof)),
        _ => Err(tokenizer.error(ErrorKind::UnresolvedToken)),
    }
}

fn parse_map<S: Source>(tokenizer: &mut Tokenizer<S>) -> Result<Value, ParseError> {
    let mut map = Map::new();
    loop {
        // Key.
        let key = match tokenizer.next_token()? {
            Token::Str(key) => key,
            Token::Eof => return Err(tokenizer.error(ErrorKind::UnexpectedEof)),
            _ => return Err(tokenizer.error(ErrorKind::ExpectedString)),
        };

        // ':'
        match tokenizer.next_token()? {
            Token::Colon => {}
            Token::Eof => return Err(tokenizer.error(ErrorKind::UnexpectedEof)),
            _ => return Err(tokenizer.error(ErrorKind::ExpectedColon)),
        }

        // Value; a duplicate key displaces the earlier value, which is
        // dropped right here — last write wins.
        let value = parse_value(tokenizer)?;
        let _displaced = map.put(key, Rc::new(value));

        // ',' or '}'
        match tokenizer.next_token()? {
            Token::BraceClose => return Ok(Value::Map(map)),
            Token::Comma => {}
            Token::Eof => return Err(tokenizer.error(ErrorKind::UnexpectedEof)),
            _ => return Err(tokenizer.error(ErrorKind::ExpectedCommaOrClosingBrace)),
        }
    }
}

fn parse_array<S: Source>(tokenizer: &mut Tokenizer<S>) -> Result<Value, ParseError> {
    let mut array = Array::new();
    loop {
        let item = parse_value(tokenizer)?;
        array.push(Rc::new(item));

        // ',' or ']'
        match tokenizer.next_token()? {
            Token::BracketClose => return Ok(Value::Array(array)),
            Token::Comma => {}
            Token::Eof => return Err(tokenizer.error(ErrorKind::UnexpectedEof)),
            _ => return Err(tokenizer.error(ErrorKind::ExpectedCommaOrClosingBracket)),
        }
    }
}
