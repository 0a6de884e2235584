// SPDX-License-Identifier: Apache-2.0

//! Token stream dump for debugging.

use std::io::{self, Write};

use crate::source::Source;
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Write the token stream to `out`, one token after another.
///
/// Stops after `EOF` or at the first tokenizer error, which is reported
/// inline with its location. Only I/O failures on `out` propagate.
pub fn dump_tokens<S: Source, W: Write>(
    tokenizer: &mut Tokenizer<S>,
    out: &mut W,
) -> io::Result<()> {
    loop {
        let token = match tokenizer.next_token() {
            Ok(token) => token,
            Err(err) => {
                writeln!(
                    out,
                    "ERROR ({} at {}:{})",
                    err.kind.message(),
                    err.line,
                    err.pos
                )?;
                return Ok(());
            }
        };
        match token {
            Token::Eof => {
                writeln!(out, "EOF")?;
                return Ok(());
            }
            Token::BraceOpen => write!(out, "{{ ")?,
            Token::BraceClose => write!(out, "}} ")?,
            Token::BracketOpen => write!(out, "[ ")?,
            Token::BracketClose => write!(out, "] ")?,
            Token::Colon => write!(out, ": ")?,
            Token::Comma => write!(out, ", ")?,
            Token::Str(buf) => write!(out, "string({}) ", String::from_utf8_lossy(&buf))?,
            Token::Int(v) => write!(out, "int({v}) ")?,
            Token::Float(v) => write!(out, "float({v}) ")?,
            Token::Bool(v) => write!(out, "bool({}) ", u8::from(v))?,
            Token::Null => write!(out, "null ")?,
            Token::Symbol(buf) => write!(out, "sym({}) ", String::from_utf8_lossy(&buf))?,
        }
    }
}
