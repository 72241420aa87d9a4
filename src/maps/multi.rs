use std::hash::Hash;

use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::error::{StrataError, StrataResult};
use crate::sets::OrderedSet;

/// Many-to-many association between two key spaces.
///
/// Two mirrored indices are kept: `key1 -> {key2}` and `key2 -> {key1}`.
/// A pair is reachable from one index exactly when it is reachable from the
/// other, and a key whose bucket becomes empty is dropped from its index.
///
/// Keys and buckets both preserve insertion order: keys are listed in the
/// order they first gained a partner, and the partners of a key in the
/// order the pairs were added. A key that loses its last partner and later
/// comes back goes to the end.
#[derive(Debug, Clone)]
pub struct MultiBiMap<K1, K2>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
{
    by_key1: FxHashMap<K1, OrderedSet<K2>>,
    by_key2: FxHashMap<K2, OrderedSet<K1>>,
    keys1: OrderedSet<K1>,
    keys2: OrderedSet<K2>,
    len: usize,
}

impl<K1, K2> Default for MultiBiMap<K1, K2>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K1, K2> MultiBiMap<K1, K2>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            by_key1: FxHashMap::with_hasher(FxBuildHasher::default()),
            by_key2: FxHashMap::with_hasher(FxBuildHasher::default()),
            keys1: OrderedSet::new(),
            keys2: OrderedSet::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_key1: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            by_key2: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            keys1: OrderedSet::with_capacity(capacity),
            keys2: OrderedSet::with_capacity(capacity),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.by_key1.clear();
        self.by_key2.clear();
        self.keys1.clear();
        self.keys2.clear();
        self.len = 0;
    }

    pub fn keys1(&self) -> impl Iterator<Item = &K1> + '_ {
        self.keys1.iter()
    }

    pub fn keys2(&self) -> impl Iterator<Item = &K2> + '_ {
        self.keys2.iter()
    }

    /// Iterates every stored pair once, grouped by key1 in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K1, &K2)> + '_ {
        self.keys1.iter().flat_map(move |key1| {
            self.by_key1
                .get(key1)
                .into_iter()
                .flatten()
                .map(move |key2| (key1, key2))
        })
    }

    pub fn contains_key1(&self, key1: &K1) -> bool {
        self.by_key1.contains_key(key1)
    }

    pub fn contains_key2(&self, key2: &K2) -> bool {
        self.by_key2.contains_key(key2)
    }

    pub fn contains(&self, key1: &K1, key2: &K2) -> bool {
        self.by_key1
            .get(key1)
            .is_some_and(|bucket| bucket.contains(key2))
    }

    /// Partners of `key1`, in insertion order.
    pub fn get_values_from_key1(&self, key1: &K1) -> StrataResult<&OrderedSet<K2>> {
        self.try_get_values_from_key1(key1)
            .ok_or_else(|| StrataError::not_found("no pair with the given key1"))
    }

    /// Partners of `key2`, in insertion order.
    pub fn get_values_from_key2(&self, key2: &K2) -> StrataResult<&OrderedSet<K1>> {
        self.try_get_values_from_key2(key2)
            .ok_or_else(|| StrataError::not_found("no pair with the given key2"))
    }

    pub fn try_get_values_from_key1(&self, key1: &K1) -> Option<&OrderedSet<K2>> {
        self.by_key1.get(key1)
    }

    pub fn try_get_values_from_key2(&self, key2: &K2) -> Option<&OrderedSet<K1>> {
        self.by_key2.get(key2)
    }

    /// Removes exactly the pair `(key1, key2)`.
    ///
    /// Buckets emptied by the removal are dropped from both indices.
    pub fn remove(&mut self, key1: &K1, key2: &K2) -> bool {
        if !self.contains(key1, key2) {
            return false;
        }

        Self::unlink(&mut self.by_key1, &mut self.keys1, key1, key2);
        Self::unlink(&mut self.by_key2, &mut self.keys2, key2, key1);
        self.len -= 1;

        debug_assert!(!self.contains(key1, key2));
        true
    }

    /// Removes `value` from the bucket of `key`, dropping the bucket and the
    /// key if it ends up empty.
    fn unlink<A, B>(
        index: &mut FxHashMap<A, OrderedSet<B>>,
        keys: &mut OrderedSet<A>,
        key: &A,
        value: &B,
    ) where
        A: Eq + Hash,
        B: Eq + Hash,
    {
        if let Some(bucket) = index.get_mut(key) {
            bucket.remove(value);
            if bucket.is_empty() {
                index.remove(key);
                keys.remove(key);
            }
        }
    }
}

impl<K1, K2> MultiBiMap<K1, K2>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
{
    /// Adds the pair `(key1, key2)`.
    ///
    /// Fails with `Conflict` if the pair is already stored.
    pub fn add(&mut self, key1: K1, key2: K2) -> StrataResult<()> {
        if self.try_add(key1, key2) {
            Ok(())
        } else {
            Err(StrataError::conflict("pair is already present"))
        }
    }

    /// Adds the pair `(key1, key2)`, returning false if it is already stored.
    pub fn try_add(&mut self, key1: K1, key2: K2) -> bool {
        if self.contains(&key1, &key2) {
            return false;
        }

        self.keys1.insert(key1.clone());
        self.keys2.insert(key2.clone());
        self.by_key2
            .entry(key2.clone())
            .or_default()
            .insert(key1.clone());
        self.by_key1.entry(key1).or_default().insert(key2);
        self.len += 1;
        true
    }

    /// Removes every pair whose first component is `key1`.
    ///
    /// Returns the partners that were attached to `key1`, in insertion order.
    pub fn remove_key1(&mut self, key1: &K1) -> Option<OrderedSet<K2>> {
        let bucket = self.by_key1.remove(key1)?;
        self.keys1.remove(key1);
        for key2 in &bucket {
            Self::unlink(&mut self.by_key2, &mut self.keys2, key2, key1);
        }
        self.len -= bucket.len();

        debug_assert!(bucket.iter().all(|key2| !self
            .by_key2
            .get(key2)
            .is_some_and(|mirror| mirror.contains(key1))));
        Some(bucket)
    }

    /// Removes every pair whose second component is `key2`.
    ///
    /// Returns the partners that were attached to `key2`, in insertion order.
    pub fn remove_key2(&mut self, key2: &K2) -> Option<OrderedSet<K1>> {
        let bucket = self.by_key2.remove(key2)?;
        self.keys2.remove(key2);
        for key1 in &bucket {
            Self::unlink(&mut self.by_key1, &mut self.keys1, key1, key2);
        }
        self.len -= bucket.len();

        debug_assert!(bucket.iter().all(|key1| !self.contains(key1, key2)));
        Some(bucket)
    }
}
