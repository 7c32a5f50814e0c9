//! Memo table for string-keyed lookups
//!
//! This implementation is pretty bare-bones. Entries are never expired one by
//! one: the table is emptied by `invalidate` when the answers it holds go
//! stale, and emptied wholesale when it reaches capacity.

use seahash::SeaHasher;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::RwLock;

type HashMapSea<K, V> = HashMap<K, V, BuildHasherDefault<SeaHasher>>;

/// Default number of entries a `Lookup` holds before it is cleared.
pub const DEFAULT_CAPACITY: usize = 256;

/// A bounded memo table from `String` keys to cloneable answers.
///
/// Reads and writes take `&self`; the table is guarded by a `RwLock` so a
/// `Lookup` may be shared between threads.
#[derive(Debug)]
pub struct Lookup<V> {
    inner: RwLock<HashMapSea<String, V>>,
    capacity: usize,
}

impl<V> Default for Lookup<V> {
    fn default() -> Lookup<V> {
        Lookup::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<V> Lookup<V> {
    /// Create a `Lookup` that holds at most `capacity` answers. A capacity of
    /// zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Lookup<V> {
        Lookup {
            inner: RwLock::new(HashMapSea::default()),
            capacity: capacity.max(1),
        }
    }

    /// Forget every remembered answer.
    pub fn invalidate(&self) {
        let mut w = self.inner.write().unwrap_or_else(|e| e.into_inner());
        w.clear();
    }

    /// The number of remembered answers.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Determine if no answer is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Lookup<V>
where
    V: Clone,
{
    /// Return the answer remembered for `key`, computing and remembering it
    /// with `compute` if there is none.
    ///
    /// `compute` runs without the table lock held.
    pub fn get_or_insert_with<F>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        {
            let r = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if let Some(v) = r.get(key) {
                return v.clone();
            }
        }

        let value = compute();
        let mut w = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if w.len() >= self.capacity && !w.contains_key(key) {
            trace!("lookup cache full at {} entries, clearing", w.len());
            w.clear();
        }
        w.insert(key.to_string(), value.clone());
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn remembers_answers() {
        let lookup: Lookup<Option<String>> = Lookup::default();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let v = lookup.get_or_insert_with("Host", || {
                calls.set(calls.get() + 1);
                Some("http.host".to_string())
            });
            assert_eq!(Some("http.host".to_string()), v);
        }
        assert_eq!(1, calls.get());
        assert_eq!(1, lookup.len());
    }

    #[test]
    fn invalidate_forgets() {
        let lookup: Lookup<bool> = Lookup::default();
        assert!(lookup.get_or_insert_with("a", || true));
        lookup.invalidate();
        assert!(lookup.is_empty());
        assert!(!lookup.get_or_insert_with("a", || false));
    }

    #[test]
    fn clears_when_full() {
        let lookup: Lookup<usize> = Lookup::with_capacity(2);
        lookup.get_or_insert_with("a", || 1);
        lookup.get_or_insert_with("b", || 2);
        assert_eq!(2, lookup.len());

        lookup.get_or_insert_with("c", || 3);
        assert_eq!(1, lookup.len());
        assert_eq!(3, lookup.get_or_insert_with("c", || 0));
        assert_eq!(0, lookup.get_or_insert_with("a", || 0));
    }

    #[test]
    fn zero_capacity_still_remembers_one() {
        let lookup: Lookup<usize> = Lookup::with_capacity(0);
        lookup.get_or_insert_with("a", || 1);
        assert_eq!(1, lookup.get_or_insert_with("a", || 7));
    }
}
