use bit_vec::BitVec;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Record of the vertices a traversal has already reached.
///
/// `visit` marks a value and reports whether it was new, which is the only
/// question a search needs answered before expanding a vertex.
pub trait Visited<V>: Default {
    /// Marks `value`, returning true the first time it is seen.
    fn visit(&mut self, value: V) -> bool;

    fn is_visited(&self, value: &V) -> bool;
}

impl<V> Visited<V> for FxHashSet<V>
where
    V: Eq + Hash,
{
    #[inline]
    fn visit(&mut self, value: V) -> bool {
        self.insert(value)
    }

    #[inline]
    fn is_visited(&self, value: &V) -> bool {
        self.contains(value)
    }
}

/// Dense visited store for graphs whose vertices are small integers.
impl Visited<usize> for BitVec {
    #[inline]
    fn visit(&mut self, value: usize) -> bool {
        if value >= self.len() {
            self.grow(value + 1 - self.len(), false);
        }

        let fresh = !self[value];
        if fresh {
            self.set(value, true);
        }
        fresh
    }

    #[inline]
    fn is_visited(&self, value: &usize) -> bool {
        self.get(*value).unwrap_or(false)
    }
}
