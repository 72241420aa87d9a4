use std::hash::Hash;

/// Adjacency access needed by the graph searches.
///
/// A type implementing `Successors` can be walked by [`GraphDfs`],
/// [`GraphBfs`], [`GraphBfsLayers`] and converted into a spanning tree.
/// The order in which `successors` yields heads is the order in which the
/// searches discover them.
///
/// [`GraphDfs`]: crate::graphs::search::GraphDfs
/// [`GraphBfs`]: crate::graphs::search::GraphBfs
/// [`GraphBfsLayers`]: crate::graphs::bfs::GraphBfsLayers
pub trait Successors {
    type Vertex: Eq + Hash + Clone;

    type Successors<'a>: Iterator<Item = &'a Self::Vertex>
    where
        Self: 'a;

    /// Returns true when `vertex` belongs to the graph.
    fn has_vertex(&self, vertex: &Self::Vertex) -> bool;

    /// Heads of all arcs leaving `vertex`.
    ///
    /// Yields nothing for a vertex without outgoing arcs or outside the
    /// graph.
    fn successors(&self, vertex: &Self::Vertex) -> Self::Successors<'_>;
}
