use std::slice::Iter;

use tracing::trace;

use crate::error::{StrataError, StrataResult};
use crate::maps::key_pair::KeyPair;

/// Equality relation used to match keys.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparer, which lets callers match
/// keys case-insensitively, by a projection, and so on.
pub trait Comparer<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
}

/// Comparer that defers to `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComparer;

impl<T: PartialEq + ?Sized> Comparer<T> for DefaultComparer {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

impl<T: ?Sized, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// One-to-one association between two key spaces.
///
/// The pairs form a bijection over the stored domain: no two pairs share a
/// `key1` under `C1`, and no two pairs share a `key2` under `C2`.
///
/// Lookups scan the backing vector linearly. The map is meant for small to
/// medium sized associations where arbitrary comparers matter more than
/// lookup speed.
#[derive(Debug, Clone)]
pub struct UniqueBiMap<K1, K2, C1 = DefaultComparer, C2 = DefaultComparer> {
    pairs: Vec<KeyPair<K1, K2>>,
    comparer1: C1,
    comparer2: C2,
}

impl<K1, K2> Default for UniqueBiMap<K1, K2>
where
    K1: PartialEq,
    K2: PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K1, K2> UniqueBiMap<K1, K2>
where
    K1: PartialEq,
    K2: PartialEq,
{
    pub fn new() -> Self {
        Self::with_comparers(DefaultComparer, DefaultComparer)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
            comparer1: DefaultComparer,
            comparer2: DefaultComparer,
        }
    }

    /// Builds a map from pairs with strict insertion semantics.
    ///
    /// Fails with `Conflict` on the first pair that reuses a key.
    pub fn try_from_pairs<I>(pairs: I) -> StrataResult<Self>
    where
        I: IntoIterator<Item = (K1, K2)>,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity(pairs.size_hint().0);
        for (key1, key2) in pairs {
            map.add(key1, key2)?;
        }
        Ok(map)
    }
}

impl<K1, K2, C1, C2> UniqueBiMap<K1, K2, C1, C2>
where
    C1: Comparer<K1>,
    C2: Comparer<K2>,
{
    pub fn with_comparers(comparer1: C1, comparer2: C2) -> Self {
        Self {
            pairs: Vec::new(),
            comparer1,
            comparer2,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, KeyPair<K1, K2>> {
        self.pairs.iter()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Adds a new pair.
    ///
    /// Fails with `Conflict` if either key already takes part in a pair,
    /// including when exactly this pair is already stored.
    pub fn add(&mut self, key1: K1, key2: K2) -> StrataResult<()> {
        self.insert(key1, key2, true).map(|_| ())
    }

    /// Adds a pair, remapping an existing one when only one side matches.
    ///
    /// - neither key present: the pair is appended.
    /// - the identical pair is present: nothing changes.
    /// - only `key1` is present: its partner becomes `key2`.
    /// - only `key2` is present: its partner becomes `key1`.
    ///
    /// Returns false, without modifying the map, when `key1` and `key2` are
    /// both present in two different pairs.
    pub fn set_pair(&mut self, key1: K1, key2: K2) -> bool {
        // The non-strict path never produces an error.
        self.insert(key1, key2, false).unwrap_or(false)
    }

    fn insert(&mut self, key1: K1, key2: K2, strict: bool) -> StrataResult<bool> {
        let index1 = self.position_of_key1(&key1);
        let index2 = self.position_of_key2(&key2);

        match (index1, index2) {
            (None, None) => {
                self.pairs.push(KeyPair::new(key1, key2));
                Ok(true)
            }
            (Some(i), Some(j)) if i == j => {
                if strict {
                    return Err(StrataError::conflict("pair is already present"));
                }
                Ok(true)
            }
            (Some(i), None) => {
                if strict {
                    return Err(StrataError::conflict("key1 is already mapped"));
                }
                trace!(index = i, "remapping key2 of existing pair");
                self.pairs[i].key2 = key2;
                Ok(true)
            }
            (None, Some(j)) => {
                if strict {
                    return Err(StrataError::conflict("key2 is already mapped"));
                }
                trace!(index = j, "remapping key1 of existing pair");
                self.pairs[j].key1 = key1;
                Ok(true)
            }
            (Some(_), Some(_)) => {
                if strict {
                    return Err(StrataError::conflict(
                        "key1 and key2 are mapped in different pairs",
                    ));
                }
                Ok(false)
            }
        }
    }

    fn position_of_key1(&self, key1: &K1) -> Option<usize> {
        self.pairs
            .iter()
            .position(|pair| self.comparer1.equals(&pair.key1, key1))
    }

    fn position_of_key2(&self, key2: &K2) -> Option<usize> {
        self.pairs
            .iter()
            .position(|pair| self.comparer2.equals(&pair.key2, key2))
    }

    pub fn get_by_key1(&self, key1: &K1) -> StrataResult<&K2> {
        self.try_get_by_key1(key1)
            .ok_or_else(|| StrataError::not_found("no pair with the given key1"))
    }

    pub fn get_by_key2(&self, key2: &K2) -> StrataResult<&K1> {
        self.try_get_by_key2(key2)
            .ok_or_else(|| StrataError::not_found("no pair with the given key2"))
    }

    pub fn try_get_by_key1(&self, key1: &K1) -> Option<&K2> {
        self.position_of_key1(key1).map(|i| &self.pairs[i].key2)
    }

    pub fn try_get_by_key2(&self, key2: &K2) -> Option<&K1> {
        self.position_of_key2(key2).map(|i| &self.pairs[i].key1)
    }

    /// Removes the pair keyed by `key1`, returning it.
    pub fn remove_by_key1(&mut self, key1: &K1) -> Option<KeyPair<K1, K2>> {
        let index = self.position_of_key1(key1)?;
        Some(self.pairs.remove(index))
    }

    /// Removes the pair keyed by `key2`, returning it.
    pub fn remove_by_key2(&mut self, key2: &K2) -> Option<KeyPair<K1, K2>> {
        let index = self.position_of_key2(key2)?;
        Some(self.pairs.remove(index))
    }

    pub fn contains_key1(&self, key1: &K1) -> bool {
        self.position_of_key1(key1).is_some()
    }

    pub fn contains_key2(&self, key2: &K2) -> bool {
        self.position_of_key2(key2).is_some()
    }

    pub fn contains(&self, key1: &K1, key2: &K2) -> bool {
        self.pairs.iter().any(|pair| {
            self.comparer1.equals(&pair.key1, key1) && self.comparer2.equals(&pair.key2, key2)
        })
    }
}

impl<'a, K1, K2, C1, C2> IntoIterator for &'a UniqueBiMap<K1, K2, C1, C2> {
    type Item = &'a KeyPair<K1, K2>;
    type IntoIter = Iter<'a, KeyPair<K1, K2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn strict_add_rejects_reused_key1() {
        let mut map = UniqueBiMap::new();
        map.add("a", 1).unwrap();

        let err = map.add("a", 2).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_by_key1(&"a"), Ok(&1));
    }

    #[test]
    fn strict_add_rejects_reused_key2_and_identical_pair() {
        let mut map = UniqueBiMap::new();
        map.add("a", 1).unwrap();

        assert!(map.add("b", 1).unwrap_err().is_conflict());
        assert!(map.add("a", 1).unwrap_err().is_conflict());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn set_pair_remaps_key2() {
        let mut map = UniqueBiMap::new();
        assert!(map.set_pair('a', 'b'));
        assert!(map.set_pair('a', 'c'));

        assert_eq!(map.get_by_key1(&'a'), Ok(&'c'));
        assert_eq!(map.try_get_by_key2(&'b'), None);
        assert_eq!(map.try_get_by_key2(&'c'), Some(&'a'));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn set_pair_remaps_key1() {
        let mut map = UniqueBiMap::new();
        assert!(map.set_pair(1, "x"));
        assert!(map.set_pair(2, "x"));

        assert_eq!(map.get_by_key2(&"x"), Ok(&2));
        assert!(!map.contains_key1(&1));
    }

    #[test]
    fn set_pair_identical_pair_is_noop() {
        let mut map = UniqueBiMap::new();
        assert!(map.set_pair(1, 10));
        assert!(map.set_pair(1, 10));
        assert_eq!(map.len(), 1);
        assert!(map.contains(&1, &10));
    }

    #[test]
    fn set_pair_fails_when_both_keys_are_mapped_elsewhere() {
        let mut map = UniqueBiMap::new();
        map.add(1, 10).unwrap();
        map.add(2, 20).unwrap();

        assert!(!map.set_pair(1, 20));
        assert!(map.contains(&1, &10));
        assert!(map.contains(&2, &20));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let map: UniqueBiMap<u8, u8> = UniqueBiMap::new();
        assert!(map.get_by_key1(&0).unwrap_err().is_not_found());
        assert!(map.get_by_key2(&0).unwrap_err().is_not_found());
        assert_eq!(map.try_get_by_key1(&0), None);
    }

    #[test]
    fn remove_by_either_side() {
        let mut map = UniqueBiMap::try_from_pairs([(1, 'a'), (2, 'b'), (3, 'c')]).unwrap();

        assert_eq!(map.remove_by_key1(&2), Some(KeyPair::new(2, 'b')));
        assert_eq!(map.remove_by_key2(&'c'), Some(KeyPair::new(3, 'c')));
        assert_eq!(map.remove_by_key1(&2), None);

        let remaining: Vec<(i32, char)> = map.iter().map(|p| (p.key1, p.key2)).collect();
        assert_eq!(remaining, vec![(1, 'a')]);
    }

    #[test]
    fn try_from_pairs_rejects_duplicates() {
        let result = UniqueBiMap::try_from_pairs([(1, 'a'), (2, 'a')]);
        assert!(result.unwrap_err().is_conflict());
    }

    #[test]
    fn try_from_pairs_keeps_pair_order() {
        let map = UniqueBiMap::try_from_pairs([(3, 'c'), (1, 'a'), (2, 'b')]).unwrap();
        let pairs: Vec<(i32, char)> = map.iter().map(|p| p.into_tuple()).collect();
        assert_eq!(pairs, vec![(3, 'c'), (1, 'a'), (2, 'b')]);
        assert_eq!(map.get_by_key2(&'a'), Ok(&1));
    }

    #[test]
    fn custom_comparers() {
        let mut map = UniqueBiMap::with_comparers(
            |a: &String, b: &String| a.eq_ignore_ascii_case(b),
            |a: &i32, b: &i32| a.abs() == b.abs(),
        );
        map.add("Key".to_string(), 5).unwrap();

        assert!(map.add("KEY".to_string(), 6).unwrap_err().is_conflict());
        assert!(map.add("other".to_string(), -5).unwrap_err().is_conflict());
        assert_eq!(map.get_by_key1(&"key".to_string()), Ok(&5));
        assert!(map.contains(&"kEy".to_string(), &-5));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, u8),
        Set(u8, u8),
        RemoveKey1(u8),
        RemoveKey2(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..12, 0u8..12).prop_map(|(a, b)| Op::Add(a, b)),
            (0u8..12, 0u8..12).prop_map(|(a, b)| Op::Set(a, b)),
            (0u8..12).prop_map(Op::RemoveKey1),
            (0u8..12).prop_map(Op::RemoveKey2),
        ]
    }

    proptest! {
        // Whatever sequence of mutations is applied, both key sides stay unique,
        // and failed mutations leave the map untouched.
        #[test]
        fn prop_bijection_survives_mutation(ops in prop::collection::vec(op(), 0..150)) {
            let mut map: UniqueBiMap<u8, u8> = UniqueBiMap::new();

            for op in ops {
                let before: Vec<KeyPair<u8, u8>> = map.iter().copied().collect();
                match op {
                    Op::Add(a, b) => {
                        let expect_ok = !map.contains_key1(&a) && !map.contains_key2(&b);
                        let result = map.add(a, b);
                        prop_assert_eq!(result.is_ok(), expect_ok);
                        if !expect_ok {
                            let after: Vec<KeyPair<u8, u8>> = map.iter().copied().collect();
                            prop_assert_eq!(before, after);
                        }
                    }
                    Op::Set(a, b) => {
                        if map.set_pair(a, b) {
                            prop_assert_eq!(map.get_by_key1(&a), Ok(&b));
                            prop_assert_eq!(map.get_by_key2(&b), Ok(&a));
                        } else {
                            let after: Vec<KeyPair<u8, u8>> = map.iter().copied().collect();
                            prop_assert_eq!(before, after);
                        }
                    }
                    Op::RemoveKey1(a) => {
                        map.remove_by_key1(&a);
                        prop_assert!(!map.contains_key1(&a));
                    }
                    Op::RemoveKey2(b) => {
                        map.remove_by_key2(&b);
                        prop_assert!(!map.contains_key2(&b));
                    }
                }

                let pairs: Vec<KeyPair<u8, u8>> = map.iter().copied().collect();
                for (i, p) in pairs.iter().enumerate() {
                    for q in &pairs[i + 1..] {
                        prop_assert_ne!(p.key1, q.key1);
                        prop_assert_ne!(p.key2, q.key2);
                    }
                }
            }
        }
    }
}
