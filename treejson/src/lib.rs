// SPDX-License-Identifier: Apache-2.0

//! A streaming JSON tokenizer and recursive-descent parser that builds a
//! tree of shared, dynamically typed values.
//!
//! The pipeline is: a [`Source`] yields one character at a time, the
//! [`Tokenizer`] turns characters into tokens with a hand-rolled state
//! machine, and the parser assembles tokens into a [`Value`] tree whose
//! containers hold their children behind `Rc`.
//!
//! Dialect notes, kept deliberately:
//! - numbers are 32-bit (`i32`/`f32`);
//! - `\uXXXX` escapes cover the Basic Multilingual Plane only, with no
//!   surrogate pairing — string values are byte buffers for this reason;
//! - an embedded NUL byte ends the input early;
//! - `[]` and `{}` are rejected: the grammar wants at least one element.
//!
//! Parsing is single-threaded and runs to completion or to the first
//! error, which carries the line and position of the offending character.

mod array;
mod dump;
mod error;
mod map;
mod parser;
mod source;
mod token;
mod tokenizer;
mod value;

pub use array::Array;
pub use dump::dump_tokens;
pub use error::{Error, ErrorKind, ParseError};
pub use map::{Iter as MapIter, Map};
pub use parser::{
    parse_file, parse_file_with, parse_reader, parse_source, parse_str, FileMode,
    DEFAULT_BUFFER_SIZE,
};
pub use source::{IoSource, Source, StrSource};
pub use token::Token;
pub use tokenizer::Tokenizer;
pub use value::{Kind, Value};
