//! String-keyed hash table with separate chaining.
//!
//! Keys are hashed with a polynomial rolling hash reduced modulo the current
//! capacity. The table doubles whenever an insert would leave the load factor
//! above [`MAX_LOAD_FACTOR`]; growth is reserved before any entry moves, so a
//! failed resize leaves the table exactly as it was.

use crate::error::{Result, SearchError};
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 16;
/// Upper bound on `len / capacity` once an insert returns.
pub const MAX_LOAD_FACTOR: f64 = 0.70;

// 0.70 as an exact ratio, so the resize trigger does not depend on float rounding.
const LOAD_NUM: usize = 7;
const LOAD_DEN: usize = 10;

/// Bucket index for `key`: `h = (h * 31 + code(c)) mod capacity` over each char.
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    let cap = capacity.max(1) as u128;
    key.chars()
        .fold(0u128, |h, c| (h * 31 + u128::from(u32::from(c))) % cap) as usize
}

fn over_load(count: usize, capacity: usize) -> bool {
    count.saturating_mul(LOAD_DEN) > capacity.saturating_mul(LOAD_NUM)
}

#[derive(Debug, Clone)]
pub struct ChainedHashTable<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    count: usize,
}

impl<K: AsRef<str>, V> Default for ChainedHashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<str>, V> ChainedHashTable<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one so the modulus is always defined.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self { buckets, count: 0 }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Inserts `value` under `key`. If the key is already present, `merge` folds
    /// the new value into the stored one instead of overwriting it.
    ///
    /// Returns `true` when a new entry was created.
    pub fn insert_with<F>(&mut self, key: K, value: V, merge: F) -> Result<bool>
    where
        F: FnOnce(&mut V, V),
    {
        if let Some((b, p)) = self.locate(key.as_ref()) {
            merge(&mut self.buckets[b][p].1, value);
            return Ok(false);
        }
        self.push_new(key, value)?;
        Ok(true)
    }

    /// Inserts with a replacing merge; returns the previous value if any.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if let Some((b, p)) = self.locate(key.as_ref()) {
            return Ok(Some(std::mem::replace(&mut self.buckets[b][p].1, value)));
        }
        self.push_new(key, value)?;
        Ok(None)
    }

    /// Returns the value under `key`, creating it with `make` first if absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let (b, p) = match self.locate(key.as_ref()) {
            Some(found) => found,
            None => self.push_new(key, make())?,
        };
        Ok(&mut self.buckets[b][p].1)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.locate(key).map(|(b, p)| &self.buckets[b][p].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let (b, p) = self.locate(key)?;
        Some(&mut self.buckets[b][p].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    /// Removes `key` if present. The table never shrinks.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.locate(key) {
            Some((b, p)) => {
                self.buckets[b].remove(p);
                self.count -= 1;
                true
            }
            None => false,
        }
    }

    /// Grows ahead of time so `additional` new keys can be inserted without a resize.
    ///
    /// On error the table is unchanged, and once this succeeds the next `additional`
    /// insertions of new keys cannot fail.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let target = self.count.saturating_add(additional);
        if over_load(target, self.capacity()) {
            self.grow(target)?;
        }
        Ok(())
    }

    /// Entries in bucket order, then insertion order within each bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    fn locate(&self, key: &str) -> Option<(usize, usize)> {
        let b = bucket_index(key, self.capacity());
        self.buckets[b]
            .iter()
            .position(|(k, _)| k.as_ref() == key)
            .map(|p| (b, p))
    }

    fn push_new(&mut self, key: K, value: V) -> Result<(usize, usize)> {
        if over_load(self.count + 1, self.capacity()) {
            self.grow(self.count + 1)?;
        }
        let b = bucket_index(key.as_ref(), self.capacity());
        let bucket = &mut self.buckets[b];
        bucket.push((key, value));
        self.count += 1;
        Ok((b, bucket.len() - 1))
    }

    /// Doubles capacity until `target_count` entries fit, then rehashes every entry.
    fn grow(&mut self, target_count: usize) -> Result<()> {
        let current = self.capacity();
        let mut requested = current;
        while over_load(target_count, requested) {
            requested = requested
                .checked_mul(2)
                .ok_or(SearchError::CapacityFault { current, requested: usize::MAX })?;
        }

        let mut fresh: Vec<Vec<(K, V)>> = Vec::new();
        fresh
            .try_reserve_exact(requested)
            .map_err(|_| SearchError::CapacityFault { current, requested })?;
        fresh.resize_with(requested, Vec::new);

        let old = std::mem::replace(&mut self.buckets, fresh);
        for (key, value) in old.into_iter().flatten() {
            let b = bucket_index(key.as_ref(), requested);
            self.buckets[b].push((key, value));
        }
        debug!(from = current, to = requested, entries = self.count, "resized hash table");
        Ok(())
    }
}
