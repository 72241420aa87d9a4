//! Conversion of a graph search into a spanning tree.
//!
//! The tree records, for every vertex reachable from the root, the arc along
//! which the search first reached it.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::error::{StrataError, StrataResult};
use crate::graphs::frontier::Frontier;
use crate::graphs::successors::Successors;
use crate::graphs::visited::Visited;
use crate::mem::arena::NodeId;
use crate::trees::Tree;

/// Spanning tree of the depth-first search from `root`.
///
/// Fails with `NotFound` if `root` is not a vertex of `graph`.
pub fn to_dfs_tree<G>(graph: &G, root: G::Vertex) -> StrataResult<Tree<G::Vertex>>
where
    G: Successors,
{
    spanning_tree::<G, Vec<NodeId>>(graph, root)
}

/// Spanning tree of the breadth-first search from `root`.
///
/// Fails with `NotFound` if `root` is not a vertex of `graph`.
pub fn to_bfs_tree<G>(graph: &G, root: G::Vertex) -> StrataResult<Tree<G::Vertex>>
where
    G: Successors,
{
    spanning_tree::<G, VecDeque<NodeId>>(graph, root)
}

/// Shared search loop.
///
/// When a vertex is expanded, each of its heads that has not been visited
/// yet is attached to its node straight away as a provisional child, and the
/// child's node id goes onto the frontier. A head can be attached this way
/// under several parents before any of them is popped. The first copy to be
/// popped wins; every later copy is found visited at pop time and deleted
/// from the tree. Provisional nodes never have children of their own, since
/// children are only added on expansion.
fn spanning_tree<G, F>(graph: &G, root: G::Vertex) -> StrataResult<Tree<G::Vertex>>
where
    G: Successors,
    F: Frontier<NodeId>,
{
    if !graph.has_vertex(&root) {
        return Err(StrataError::not_found("search root is not a vertex"));
    }

    let mut tree = Tree::new(root);
    let mut visited: FxHashSet<G::Vertex> = FxHashSet::default();
    let mut frontier = F::default();
    frontier.push(tree.root());

    let mut pruned = 0usize;

    while let Some(node) = frontier.pop() {
        let vertex = tree.value(node)?.clone();

        if !visited.visit(vertex.clone()) {
            trace!(?node, "pruning provisional duplicate");
            tree.delete(node)?;
            pruned += 1;
            continue;
        }

        let mut discovered = Vec::new();
        for head in graph.successors(&vertex) {
            if !visited.is_visited(head) {
                discovered.push(tree.add(node, head.clone())?);
            }
        }
        frontier.push_batch(discovered);
    }

    debug!(nodes = tree.node_count(), pruned, "built spanning tree");
    Ok(tree)
}
