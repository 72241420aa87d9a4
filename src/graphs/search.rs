use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::error::{StrataError, StrataResult};
use crate::graphs::frontier::Frontier;
use crate::graphs::successors::Successors;
use crate::graphs::visited::Visited;
use crate::graphs::worklist::Worklist;

/// Lazy single-source search over a graph.
///
/// Each vertex reachable from the root is yielded exactly once. The
/// frontier type picks the order, see [`GraphDfs`] and [`GraphBfs`].
///
/// The search borrows the graph for its whole lifetime, so the graph cannot
/// be mutated while a search over it is alive. A search is not restartable:
/// once exhausted, build a new one.
pub struct GraphSearch<'g, G, F, V>
where
    G: Successors,
    F: Frontier<G::Vertex>,
    V: Visited<G::Vertex>,
{
    graph: &'g G,
    frontier: F,
    visited: V,
}

/// Depth-first search. Heads are explored in the order the graph reports
/// them, exactly as a recursive depth-first search would.
pub type GraphDfs<'g, G, V = FxHashSet<<G as Successors>::Vertex>> =
    GraphSearch<'g, G, Vec<<G as Successors>::Vertex>, V>;

/// Breadth-first search. Heads are enqueued in the order the graph reports
/// them.
pub type GraphBfs<'g, G, V = FxHashSet<<G as Successors>::Vertex>> =
    GraphSearch<'g, G, VecDeque<<G as Successors>::Vertex>, V>;

impl<'g, G, F, V> GraphSearch<'g, G, F, V>
where
    G: Successors,
    F: Frontier<G::Vertex>,
    V: Visited<G::Vertex>,
{
    /// Starts a search at `root`.
    ///
    /// Fails with `NotFound` if `root` is not a vertex of `graph`.
    pub fn new(graph: &'g G, root: G::Vertex) -> StrataResult<Self> {
        if !graph.has_vertex(&root) {
            return Err(StrataError::not_found("search root is not a vertex"));
        }

        let mut frontier = F::default();
        frontier.push(root);

        Ok(Self {
            graph,
            frontier,
            visited: V::default(),
        })
    }
}

impl<'g, G, F, V> Iterator for GraphSearch<'g, G, F, V>
where
    G: Successors,
    F: Frontier<G::Vertex>,
    V: Visited<G::Vertex>,
{
    type Item = G::Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(vertex) = self.frontier.pop() {
            if !self.visited.visit(vertex.clone()) {
                continue;
            }

            let visited = &self.visited;
            self.frontier.push_batch(
                self.graph
                    .successors(&vertex)
                    .filter(|head| !visited.is_visited(head))
                    .cloned(),
            );

            return Some(vertex);
        }
        None
    }
}

impl<'g, G, F, V> Worklist<G::Vertex, V> for GraphSearch<'g, G, F, V>
where
    G: Successors,
    F: Frontier<G::Vertex>,
    V: Visited<G::Vertex>,
{
    fn into_visited(self) -> V {
        self.visited
    }
}
