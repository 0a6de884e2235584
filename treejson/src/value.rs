// SPDX-License-Identifier: Apache-2.0

//! The dynamic value model.
//!
//! A parsed document is a tree of [`Value`] nodes. Containers hold their
//! children behind [`Rc`], so a subtree can be shared between several
//! parents; cloning the `Rc` takes another reference and dropping the last
//! one tears the subtree down recursively. The counts are not atomic —
//! a tree must stay on one thread. Reference cycles cannot be built
//! through this API and remain the caller's responsibility if interior
//! mutability is added around it.

use std::rc::Rc;

use crate::array::Array;
use crate::map::Map;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Int,
    Bool,
    Float,
    Str,
    Array,
    Map,
}

/// A node in a JSON tree.
///
/// Strings are owned byte buffers, not `String`: a `\uXXXX` escape in the
/// surrogate range decodes to bytes that are not valid UTF-8, and the
/// model stores exactly what was scanned.
#[derive(Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i32),
    Bool(bool),
    Float(f32),
    Str(Vec<u8>),
    Array(Array),
    Map(Map),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The raw bytes of a string value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// The string value, if it happens to be valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => std::str::from_utf8(v).ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Element of an array value; `None` for out-of-range indices and for
    /// values that are not arrays.
    pub fn at(&self, index: usize) -> Option<&Rc<Value>> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Entry of a map value; `None` for missing keys and for values that
    /// are not maps.
    pub fn entry<K: AsRef<[u8]>>(&self, key: K) -> Option<&Rc<Value>> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Number of elements of an array or map value.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(v) => Some(v.len()),
            Value::Map(v) => Some(v.len()),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

/// Copies the text into a new buffer.
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.as_bytes().to_vec())
    }
}

/// Takes ownership of the buffer without copying.
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v.into_bytes())
    }
}

/// Takes ownership of the buffer without copying.
impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Str(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_accessors_agree() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert!(Value::Null.is_null());

        let v = Value::from(7);
        assert_eq!(v.kind(), Kind::Int);
        assert_eq!(v.as_int(), Some(7));
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_float(), None);

        let v = Value::from(true);
        assert_eq!(v.kind(), Kind::Bool);
        assert_eq!(v.as_bool(), Some(true));

        let v = Value::from(2.5f32);
        assert_eq!(v.kind(), Kind::Float);
        assert_eq!(v.as_float(), Some(2.5));
        assert_eq!(v.as_int(), None);
    }

    #[test]
    fn string_constructors_copy_or_move() {
        let copied = Value::from("hello");
        assert_eq!(copied.as_str(), Some("hello"));
        assert_eq!(copied.as_bytes(), Some(&b"hello"[..]));

        let owned = Value::from(String::from("world"));
        assert_eq!(owned.as_str(), Some("world"));

        let bytes = Value::from(vec![0xed, 0xa0, 0xbd]);
        assert_eq!(bytes.as_str(), None); // lone surrogate, not UTF-8
        assert_eq!(bytes.as_bytes(), Some(&[0xed, 0xa0, 0xbd][..]));
    }

    #[test]
    fn container_conveniences() {
        let mut array = Array::new();
        array.push(Rc::new(Value::from(1)));
        array.push(Rc::new(Value::from(2)));
        let value = Value::from(array);
        assert_eq!(value.len(), Some(2));
        assert_eq!(value.at(1).unwrap().as_int(), Some(2));
        assert!(value.at(2).is_none());
        assert!(value.entry("missing").is_none());

        let mut map = Map::new();
        map.put(b"k".to_vec(), Rc::new(Value::from("v")));
        let value = Value::from(map);
        assert_eq!(value.len(), Some(1));
        assert_eq!(value.entry("k").unwrap().as_str(), Some("v"));
        assert!(value.at(0).is_none());

        assert_eq!(Value::Null.len(), None);
    }
}
