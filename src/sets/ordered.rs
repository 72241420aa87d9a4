use std::{
    fmt,
    hash::Hash,
    iter::FromIterator,
    slice::Iter,
    vec::IntoIter,
};

use rustc_hash::{FxBuildHasher, FxHashSet};

/// Hash set that remembers insertion order.
///
/// Membership is answered by an FxHash index, iteration walks a vector in
/// the order values were first inserted. Removing a value keeps the
/// relative order of the remaining ones.
///
/// Every bucket of the bidirectional multi map and the vertex set of the
/// directed graph is an `OrderedSet`, which is what makes traversal order
/// deterministic: the heads of a vertex are always visited in the order
/// their arcs were added.
#[derive(Clone)]
pub struct OrderedSet<T: Eq + Hash> {
    index: FxHashSet<T>,
    order: Vec<T>,
}

impl<T: Eq + Hash> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    /// Inserts a value at the end of the order.
    ///
    /// Returns false, and leaves the order untouched, if the value was
    /// already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.index.contains(&value) {
            return false;
        }
        self.index.insert(value.clone());
        self.order.push(value);
        true
    }
}

impl<T: Eq + Hash> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            index: FxHashSet::with_hasher(FxBuildHasher::default()),
            order: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashSet::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates values in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.order
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index.contains(value)
    }

    /// Removes a value, shifting later values down by one position.
    pub fn remove(&mut self, value: &T) -> bool {
        if !self.index.remove(value) {
            return false;
        }
        if let Some(position) = self.order.iter().position(|v| v == value) {
            self.order.remove(position);
        }
        true
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let index = &mut self.index;
        self.order.retain(|v| {
            let keep = f(v);
            if !keep {
                index.remove(v);
            }
            keep
        });
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.index.is_subset(&other.index)
    }
}

impl<T: Eq + Hash> PartialEq for OrderedSet<T> {
    /// Set equality, insertion order is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T: Eq + Hash> Eq for OrderedSet<T> {}

impl<T: Eq + Hash + fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.order.iter()).finish()
    }
}

impl<T: Eq + Hash> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl<'a, T: Eq + Hash> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use proptest::prelude::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut set = OrderedSet::new();
        assert!(set.insert('c'));
        assert!(set.insert('a'));
        assert!(set.insert('b'));
        assert!(!set.insert('a'));

        assert_eq!(set.as_slice(), &['c', 'a', 'b']);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut set: OrderedSet<u32> = [5, 1, 4, 2, 3].into_iter().collect();
        assert!(set.remove(&4));
        assert!(!set.remove(&4));
        assert_eq!(set.as_slice(), &[5, 1, 2, 3]);
        assert!(!set.contains(&4));
    }

    #[test]
    fn retain_updates_index() {
        let mut set: OrderedSet<u32> = (0..10).collect();
        set.retain(|v| v % 3 == 0);
        assert_eq!(set.as_slice(), &[0, 3, 6, 9]);
        assert!(!set.contains(&1));
        assert!(set.contains(&6));
    }

    #[test]
    fn equality_ignores_order() {
        let a: OrderedSet<u32> = [1, 2, 3].into_iter().collect();
        let b: OrderedSet<u32> = [3, 1, 2].into_iter().collect();
        assert_eq!(a, b);
        assert!(a.is_subset(&b));
    }

    proptest! {
        // The order vector and the hash index must always describe the same set,
        // and the order must be the first-insertion order of the survivors.
        #[test]
        fn prop_ordered_set_matches_reference(
            ops in prop::collection::vec((any::<bool>(), 0u8..32), 0..200),
        ) {
            let mut set = OrderedSet::new();
            let mut reference: Vec<u8> = Vec::new();

            for (insert, v) in ops {
                if insert {
                    let was_new = !reference.contains(&v);
                    if was_new {
                        reference.push(v);
                    }
                    prop_assert_eq!(set.insert(v), was_new);
                } else {
                    let was_present = reference.contains(&v);
                    reference.retain(|x| *x != v);
                    prop_assert_eq!(set.remove(&v), was_present);
                }
            }

            prop_assert_eq!(set.as_slice(), reference.as_slice());
            let from_index: HashSet<u8> = reference.iter().copied().collect();
            for v in 0u8..32 {
                prop_assert_eq!(set.contains(&v), from_index.contains(&v));
            }
        }
    }
}
