use std::collections::{HashMap, HashSet};
use std::hash::Hash;

fn check_key_order<K, V>(map: &HashMap<K, V>, key_order: &[K])
where
    K: Eq + Hash,
{
    let mut seen_keys = HashSet::<&K>::new();
    for key in key_order {
        debug_assert!(
            map.contains_key(key),
            "All keys in key ordering for out-of-order HashMap iterator must be present in map"
        );
        let newly_seen = seen_keys.insert(key);
        debug_assert!(
            newly_seen,
            "Duplicate key seen in key ordering for out-of-order HashMap iterator",
        );
    }

    debug_assert!(
        seen_keys.len() == map.len(),
        "Missing key(s) from key ordering for out-of-order HashMap iterator. All keys must be included"
    );
}

// the iterator only borrows; keys come from the ordering, values from the map
pub struct HashMapOOOIter<'a, K, V> {
    key_order: std::slice::Iter<'a, K>,
    map: &'a HashMap<K, V>,
}

impl<'a, K, V> Iterator for HashMapOOOIter<'a, K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // keys without a value are skipped; check_key_order rules them out in debug builds
        for key in self.key_order.by_ref() {
            if let Some(value) = self.map.get(key) {
                return Some((key, value));
            }
        }
        None
    }
}

impl<'a, K, V> HashMapOOOIter<'a, K, V>
where
    K: Eq + Hash,
{
    pub fn new(map: &'a HashMap<K, V>, key_order: &'a [K]) -> Self {
        check_key_order(map, key_order);

        HashMapOOOIter {
            key_order: key_order.iter(),
            map,
        }
    }
}

/// A hash map that remembers the order keys were first inserted in, and refuses to overwrite.
#[derive(Debug, Clone)]
pub struct InsertionOrderedMap<K, V>
where
    K: Eq + Hash,
{
    entries: HashMap<K, V>,
    key_order: Vec<K>,
}

impl<K, V> InsertionOrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            key_order: Vec::new(),
        }
    }

    /// Inserts a new key; an existing key is left untouched and the rejected value is handed
    /// back.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), V> {
        if self.entries.contains_key(&key) {
            return Err(value);
        }

        self.key_order.push(key.clone());
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.key_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_order.is_empty()
    }

    pub fn iter(&self) -> HashMapOOOIter<'_, K, V> {
        HashMapOOOIter::new(&self.entries, &self.key_order)
    }
}

impl<K, V> Default for InsertionOrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
