// SPDX-License-Identifier: Apache-2.0

//! Ordered, growable sequence of shared values.

use std::rc::Rc;
use std::slice;

use crate::value::Value;

/// Slots allocated up front; growth doubles from there.
const INITIAL_CAPACITY: usize = 8;

/// An array value: an ordered sequence of shared [`Value`] nodes.
///
/// Appending is amortized O(1); indexed access is O(1) and returns `None`
/// for out-of-range indices. The iterator is a plain forward walk,
/// restartable by calling [`Array::iter`] again.
#[derive(Debug, PartialEq)]
pub struct Array {
    items: Vec<Rc<Value>>,
}

impl Array {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append an item, taking a reference to it.
    pub fn push(&mut self, value: Rc<Value>) {
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Option<&Rc<Value>> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Rc<Value>> {
        self.items.iter()
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Rc<Value>;
    type IntoIter = slice::Iter<'a, Rc<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
