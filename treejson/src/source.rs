// SPDX-License-Identifier: Apache-2.0

//! Pull-based character sources feeding the tokenizer.
//!
//! A source produces one byte per call and knows nothing about JSON. All
//! lookahead lives in the tokenizer's state. Two implementations are
//! provided: an in-memory cursor over a string and a wrapper around any
//! [`std::io::Read`] (wrap a `File` in a `BufReader` for buffered reads).

use std::io::{self, Read};

/// Supplies one character at a time to the tokenizer.
pub trait Source {
    /// Produce the next byte, or `None` at end of input.
    ///
    /// Once the end has been reached, every further call returns `None`.
    fn next_byte(&mut self) -> Option<u8>;
}

/// In-memory cursor over a string slice.
#[derive(Debug)]
pub struct StrSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl Source for StrSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }
}

/// Byte-at-a-time reader over any [`Read`] implementation.
///
/// A read error ends the input, the same way `fgetc` folds errors into
/// `EOF`; the tokenizer then reports whatever the truncation breaks.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Source for IoSource<R> {
    fn next_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
    }
}
