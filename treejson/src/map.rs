// SPDX-License-Identifier: Apache-2.0

//! Chained hash table keyed by byte strings.
//!
//! The table owns its keys; values are shared [`Value`] nodes. Buckets
//! start at a small prime count and grow to `2n + 1` whenever the number
//! of live entries reaches half the bucket count; growth relinks the
//! existing entry allocations into the new bucket array, it does not
//! rebuild them. Insertion order is not preserved.

use std::mem;
use std::rc::Rc;

use crate::value::Value;

/// Buckets allocated up front.
const INITIAL_BUCKETS: usize = 7;

struct Entry {
    key: Box<[u8]>,
    value: Rc<Value>,
    next: Option<Box<Entry>>,
}

/// A map value: byte-string keys to shared [`Value`] nodes.
pub struct Map {
    buckets: Vec<Option<Box<Entry>>>,
    len: usize,
}

/// djb2: `hash = hash * 33 + byte`, seeded at 5381.
fn hash(key: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &byte in key {
        h = h.wrapping_mul(33).wrapping_add(u32::from(byte));
    }
    h
}

fn bucket_index(key: &[u8], bucket_count: usize) -> usize {
    hash(key) as usize % bucket_count
}

impl Map {
    pub fn new() -> Self {
        let mut buckets = Vec::with_capacity(INITIAL_BUCKETS);
        buckets.resize_with(INITIAL_BUCKETS, || None);
        Self { buckets, len: 0 }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert or overwrite an entry, taking ownership of the key.
    ///
    /// On overwrite the key is replaced, the size stays unchanged, and the
    /// displaced value is handed back to the caller rather than dropped
    /// silently — last write wins, but the loser is auditable.
    pub fn put(&mut self, key: Vec<u8>, value: Rc<Value>) -> Option<Rc<Value>> {
        if self.len >= self.buckets.len() / 2 {
            self.grow();
        }

        let index = bucket_index(&key, self.buckets.len());
        let mut entry = self.buckets[index].as_deref_mut();
        while let Some(e) = entry {
            if *e.key == key[..] {
                e.key = key.into_boxed_slice();
                return Some(mem::replace(&mut e.value, value));
            }
            entry = e.next.as_deref_mut();
        }

        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry {
            key: key.into_boxed_slice(),
            value,
            next,
        }));
        self.len += 1;
        None
    }

    /// Look up a value; O(1) on average.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&Rc<Value>> {
        let key = key.as_ref();
        let index = bucket_index(key, self.buckets.len());
        let mut entry = self.buckets[index].as_deref();
        while let Some(e) = entry {
            if *e.key == *key {
                return Some(&e.value);
            }
            entry = e.next.as_deref();
        }
        None
    }

    /// Walk all entries: bucket by bucket, then chain by chain.
    ///
    /// Restartable by calling `iter` again; not defined under concurrent
    /// mutation (the borrow checker forbids it anyway).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: &self.buckets,
            bucket: 0,
            entry: None,
        }
    }

    /// Number of entries that share a bucket with at least one other.
    ///
    /// Diagnostic for hash quality; counts `chain length - 1` per
    /// occupied bucket.
    pub fn collisions(&self) -> usize {
        let mut collisions = 0;
        for bucket in &self.buckets {
            let mut chain_len = 0;
            let mut entry = bucket.as_deref();
            while let Some(e) = entry {
                chain_len += 1;
                entry = e.next.as_deref();
            }
            if chain_len > 1 {
                collisions += chain_len - 1;
            }
        }
        collisions
    }

    /// Current size of the bucket array.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Grow the bucket array to `2n + 1` and relink every entry.
    fn grow(&mut self) {
        let new_count = 2 * self.buckets.len() + 1;
        let mut new_buckets: Vec<Option<Box<Entry>>> = Vec::with_capacity(new_count);
        new_buckets.resize_with(new_count, || None);
        let old_buckets = mem::replace(&mut self.buckets, new_buckets);

        for bucket in old_buckets {
            let mut chain = bucket;
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let index = bucket_index(&entry.key, new_count);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            map.entry(&String::from_utf8_lossy(key), value);
        }
        map.finish()
    }
}

/// Key equality over all entries; insertion order is irrelevant.
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

/// Forward iterator over `(key, value)` pairs.
pub struct Iter<'a> {
    buckets: &'a [Option<Box<Entry>>],
    bucket: usize,
    entry: Option<&'a Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a Rc<Value>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.entry.is_none() {
            if self.bucket == self.buckets.len() {
                return None;
            }
            self.entry = self.buckets[self.bucket].as_deref();
            self.bucket += 1;
        }
        let entry = self.entry.take()?;
        self.entry = entry.next.as_deref();
        Some((&entry.key, &entry.value))
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a [u8], &'a Rc<Value>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i32) -> Rc<Value> {
        Rc::new(Value::from(v))
    }

    #[test]
    fn put_and_get_round_trip() {
        let mut map = Map::new();
        assert!(map.is_empty());
        assert_eq!(map.put(b"one".to_vec(), int(1)), None);
        assert_eq!(map.put(b"two".to_vec(), int(2)), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("one").unwrap().as_int(), Some(1));
        assert_eq!(map.get("two").unwrap().as_int(), Some(2));
        assert!(map.get("three").is_none());
    }

    #[test]
    fn duplicate_key_displaces_the_old_value() {
        let mut map = Map::new();
        assert_eq!(map.put(b"k".to_vec(), int(1)), None);
        let displaced = map.put(b"k".to_vec(), int(2)).expect("old value back");
        assert_eq!(displaced.as_int(), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k").unwrap().as_int(), Some(2));
    }

    #[test]
    fn repeated_overwrites_keep_size_stable() {
        let mut map = Map::new();
        for i in 0..50 {
            map.put(b"same".to_vec(), int(i));
        }
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("same").unwrap().as_int(), Some(49));
    }

    #[test]
    fn growth_follows_the_half_full_rule() {
        let mut map = Map::new();
        assert_eq!(map.bucket_count(), 7);
        for i in 0..3 {
            map.put(format!("key{i}").into_bytes(), int(i));
        }
        // The insert that would make len reach bucket_count / 2 grows first.
        assert_eq!(map.bucket_count(), 7);
        map.put(b"key3".to_vec(), int(3));
        assert_eq!(map.bucket_count(), 15);
        for i in 4..8 {
            map.put(format!("key{i}").into_bytes(), int(i));
        }
        assert_eq!(map.bucket_count(), 31);
        // Every entry survives the relinks.
        for i in 0..8 {
            assert_eq!(map.get(format!("key{i}")).unwrap().as_int(), Some(i));
        }
    }

    #[test]
    fn iterator_visits_every_entry_once() {
        let mut map = Map::new();
        for i in 0..20 {
            map.put(format!("k{i}").into_bytes(), int(i));
        }
        let mut seen: Vec<i32> = map.iter().filter_map(|(_, v)| v.as_int()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());

        // Restartable.
        assert_eq!(map.iter().count(), 20);
    }

    #[test]
    fn empty_map_iterates_nothing() {
        let map = Map::new();
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn collision_count_is_consistent_with_chains() {
        let mut map = Map::new();
        for i in 0..100 {
            map.put(format!("key-{i}").into_bytes(), int(i));
        }
        // Entries split into chain heads and collisions, so the occupied
        // bucket count plus the collision count is exactly the entry count.
        let occupied = map.buckets.iter().filter(|b| b.is_some()).count();
        assert_eq!(occupied + map.collisions(), map.len());
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = Map::new();
        let mut b = Map::new();
        a.put(b"x".to_vec(), int(1));
        a.put(b"y".to_vec(), int(2));
        b.put(b"y".to_vec(), int(2));
        b.put(b"x".to_vec(), int(1));
        assert_eq!(a, b);

        b.put(b"z".to_vec(), int(3));
        assert_ne!(a, b);
    }

    #[test]
    fn keys_are_owned_not_shared() {
        let key = b"owned".to_vec();
        let mut map = Map::new();
        map.put(key.clone(), int(1));
        drop(key);
        assert_eq!(map.get("owned").unwrap().as_int(), Some(1));
    }
}
