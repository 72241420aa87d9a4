use std::{collections::VecDeque, mem};

/// Pending work of a search.
///
/// The container decides the search: a `Vec` pops the newest item and gives
/// depth-first order, a `VecDeque` pops the oldest and gives breadth-first
/// order.
pub trait Frontier<T>: Default {
    fn push(&mut self, item: T);

    fn pop(&mut self) -> Option<T>;

    /// Adds the items discovered from one expansion.
    ///
    /// Whatever the pop discipline, the first item of the batch is handled
    /// before the second one, and so on. This is what makes the iterative
    /// depth-first search visit vertices in the same order as the recursive
    /// one.
    fn push_batch<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = T>;

    fn is_empty(&self) -> bool;
}

impl<T> Frontier<T> for Vec<T> {
    #[inline]
    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        Vec::pop(self)
    }

    fn push_batch<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.len();
        self.extend(batch);
        self[start..].reverse();
    }

    #[inline]
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<T> Frontier<T> for VecDeque<T> {
    #[inline]
    fn push(&mut self, item: T) {
        self.push_back(item);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }

    fn push_batch<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.extend(batch);
    }

    #[inline]
    fn is_empty(&self) -> bool {
        VecDeque::is_empty(self)
    }
}

/// Breadth-first frontier processed one whole layer at a time.
#[derive(Default)]
pub struct LayeredFrontier<T> {
    current: Vec<T>,
    next: Vec<T>,
}

impl<T> LayeredFrontier<T> {
    pub fn new<I: IntoIterator<Item = T>>(initial: I) -> Self {
        Self {
            current: initial.into_iter().collect(),
            next: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn layer(&self) -> &[T] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Hands the current layer to `expand`, which fills the next one.
    ///
    /// Returns the layer that was expanded, or None once the frontier is
    /// exhausted.
    pub fn step<F>(&mut self, expand: F) -> Option<Vec<T>>
    where
        F: FnOnce(&[T], &mut Vec<T>),
    {
        if self.current.is_empty() {
            return None;
        }

        let layer = mem::take(&mut self.current);
        self.next.clear();
        expand(&layer, &mut self.next);
        self.current = mem::take(&mut self.next);

        Some(layer)
    }
}
