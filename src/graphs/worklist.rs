use crate::graphs::visited::Visited;

/// A search that can be run to exhaustion for its reachable set.
pub trait Worklist<T, V: Visited<T>>: Iterator {
    /// Gives up the search and returns everything it has marked so far.
    fn into_visited(self) -> V;

    /// Drives the search to its end and returns the visited store, which
    /// then holds every vertex reachable from the start.
    fn worklist(mut self) -> V
    where
        Self: Sized,
    {
        for _ in self.by_ref() {}
        self.into_visited()
    }
}
