use std::fmt;

/// Stable handle to a value stored in an [`Arena`].
///
/// A handle carries the generation of the slot it was issued for. Once the
/// value is removed and the slot reused, the old handle no longer resolves,
/// so stale ids are detected instead of silently aliasing a new value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Position of the slot inside the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

#[derive(Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<usize> },
}

/// Slot storage with O(1) insertion and removal and generational handles.
///
/// Trees keep their nodes here: the tree owns the arena, the arena owns
/// every node, and parent/child links are plain `NodeId`s.
#[derive(Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> NodeId {
        self.len += 1;

        match self.free_head {
            Some(index) => {
                let generation = match self.slots[index] {
                    Slot::Vacant {
                        generation,
                        next_free,
                    } => {
                        self.free_head = next_free;
                        generation
                    }
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                self.slots[index] = Slot::Occupied { generation, value };
                NodeId { index, generation }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    value,
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Removes the value behind `id` and returns it.
    ///
    /// The slot's generation is bumped so `id` stops resolving.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }

        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next_free: self.free_head,
        };

        match std::mem::replace(&mut self.slots[id.index], vacant) {
            Slot::Occupied { value, .. } => {
                self.free_head = Some(id.index);
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant { .. } => unreachable!("contains() accepted a vacant slot"),
        }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.index)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.index)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, value } => Some((
                    NodeId {
                        index,
                        generation: *generation,
                    },
                    value,
                )),
                Slot::Vacant { .. } => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_ne!(a, b);
    }

    #[test]
    fn removed_id_is_stale_after_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);
        assert!(arena.is_empty());

        // The slot is reused with a new generation.
        let b = arena.insert(2);
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(!arena.contains(a));
        assert_eq!(arena.get(b), Some(&2));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = Arena::new();
        let id = arena.insert(String::from("x"));
        arena.get_mut(id).unwrap().push('y');
        assert_eq!(arena.get(id).map(String::as_str), Some("xy"));
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut arena = Arena::new();
        let ids: Vec<NodeId> = (0..5).map(|v| arena.insert(v)).collect();
        arena.remove(ids[1]);
        arena.remove(ids[3]);

        let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 2, 4]);
    }

    #[test]
    fn random_stress_arena_matches_hashmap() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x_4152_454E_41);

        for _case in 0..50 {
            let mut arena = Arena::new();
            let mut reference: HashMap<NodeId, u32> = HashMap::new();
            let mut dead: Vec<NodeId> = Vec::new();

            for _ in 0..rng.random_range(0..400) {
                if reference.is_empty() || rng.random_bool(0.6) {
                    let value: u32 = rng.random();
                    let id = arena.insert(value);
                    assert!(reference.insert(id, value).is_none(), "id reissued while live");
                } else {
                    let keys: Vec<NodeId> = reference.keys().copied().collect();
                    let id = keys[rng.random_range(0..keys.len())];
                    assert_eq!(arena.remove(id), reference.remove(&id));
                    dead.push(id);
                }

                assert_eq!(arena.len(), reference.len());
            }

            for (id, value) in &reference {
                assert_eq!(arena.get(*id), Some(value));
            }
            for id in &dead {
                assert!(!arena.contains(*id));
            }
        }
    }
}
