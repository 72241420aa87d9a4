use std::hash::Hash;
use std::slice::Iter;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{StrataError, StrataResult};
use crate::graphs::bfs::GraphBfsLayers;
use crate::graphs::search::{GraphBfs, GraphDfs};
use crate::graphs::spanning;
use crate::graphs::successors::Successors;
use crate::graphs::worklist::Worklist;
use crate::maps::MultiBiMap;
use crate::sets::OrderedSet;
use crate::trees::Tree;

/// A finite directed graph over arbitrary vertex values.
///
/// The vertex set is kept in insertion order. Arcs live in a
/// [`MultiBiMap`] keyed tail to head, so both the heads and the tails of a
/// vertex are available without scanning. Every arc joins two vertices that
/// are currently in the graph.
///
/// Heads and tails are reported in the order their arcs were added, which
/// fixes the order of every traversal.
#[derive(Debug, Clone)]
pub struct DiGraph<T>
where
    T: Eq + Hash + Clone,
{
    vertices: OrderedSet<T>,
    arcs: MultiBiMap<T, T>,
}

impl<T> Default for DiGraph<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DiGraph<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            vertices: OrderedSet::new(),
            arcs: MultiBiMap::new(),
        }
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: OrderedSet::with_capacity(vertices),
            arcs: MultiBiMap::with_capacity(vertices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> Iter<'_, T> {
        self.vertices.iter()
    }

    /// Every arc as `(tail, head)`, grouped by tail in vertex order.
    pub fn arcs(&self) -> impl Iterator<Item = (&T, &T)> + '_ {
        self.vertices
            .iter()
            .flat_map(move |tail| self.successors(tail).map(move |head| (tail, head)))
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.arcs.clear();
    }

    pub fn contains(&self, vertex: &T) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn add(&mut self, vertex: T) -> bool {
        self.vertices.insert(vertex)
    }

    /// Adds `vertex` and an arc from each of `tails` to it.
    ///
    /// Tails that are not vertices yet are skipped, as are arcs that already
    /// exist. Returns the number of arcs added.
    pub fn add_as_head<I>(&mut self, vertex: T, tails: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.add(vertex.clone());
        tails
            .into_iter()
            .filter(|tail| self.try_add_arc(tail.clone(), vertex.clone()))
            .count()
    }

    /// Adds `vertex` and an arc from it to each of `heads`.
    ///
    /// Heads that are not vertices yet are skipped, as are arcs that already
    /// exist. Returns the number of arcs added.
    pub fn add_as_tail<I>(&mut self, vertex: T, heads: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.add(vertex.clone());
        heads
            .into_iter()
            .filter(|head| self.try_add_arc(vertex.clone(), head.clone()))
            .count()
    }

    /// Removes a vertex together with every arc it is the tail or head of.
    pub fn remove(&mut self, vertex: &T) -> bool {
        if !self.vertices.remove(vertex) {
            return false;
        }

        let outgoing = self.arcs.remove_key1(vertex).map_or(0, |heads| heads.len());
        // A loop was already dropped with the outgoing arcs.
        let incoming = self.arcs.remove_key2(vertex).map_or(0, |tails| tails.len());
        debug!(outgoing, incoming, "removed vertex with its arcs");

        debug_assert!(!self.arcs.contains_key1(vertex) && !self.arcs.contains_key2(vertex));
        true
    }

    fn require_endpoints(&self, tail: &T, head: &T) -> StrataResult<()> {
        if !self.contains(tail) {
            return Err(StrataError::not_found("arc tail is not a vertex"));
        }
        if !self.contains(head) {
            return Err(StrataError::not_found("arc head is not a vertex"));
        }
        Ok(())
    }

    /// Adds the arc `tail -> head`.
    ///
    /// Fails with `NotFound` if either endpoint is not a vertex; vertices are
    /// never added implicitly. Fails with `Conflict` if the arc exists.
    pub fn add_arc(&mut self, tail: T, head: T) -> StrataResult<()> {
        self.require_endpoints(&tail, &head)?;
        self.arcs.add(tail, head)
    }

    /// Adds the arc `tail -> head` when both endpoints exist and the arc does
    /// not. Returns whether an arc was added.
    pub fn try_add_arc(&mut self, tail: T, head: T) -> bool {
        self.contains(&tail) && self.contains(&head) && self.arcs.try_add(tail, head)
    }

    /// Adds the arcs `a -> b` and `b -> a`.
    ///
    /// Whichever of the two arcs is missing gets added. Fails with
    /// `Conflict` when both are already present.
    pub fn add_edge(&mut self, a: T, b: T) -> StrataResult<()> {
        self.require_endpoints(&a, &b)?;
        if self.contains_edge(&a, &b) {
            return Err(StrataError::conflict("edge is already present"));
        }

        self.arcs.try_add(a.clone(), b.clone());
        self.arcs.try_add(b, a);
        Ok(())
    }

    pub fn remove_arc(&mut self, tail: &T, head: &T) -> bool {
        self.arcs.remove(tail, head)
    }

    /// Removes both arcs between `a` and `b`, returning true if at least one
    /// of them existed.
    pub fn remove_edge(&mut self, a: &T, b: &T) -> bool {
        let forward = self.arcs.remove(a, b);
        let backward = self.arcs.remove(b, a);
        forward || backward
    }

    pub fn contains_arc(&self, tail: &T, head: &T) -> bool {
        self.arcs.contains(tail, head)
    }

    pub fn contains_edge(&self, a: &T, b: &T) -> bool {
        self.arcs.contains(a, b) && self.arcs.contains(b, a)
    }

    /// Heads of the arcs leaving `vertex`.
    ///
    /// Fails with `NotFound` if `vertex` is not in the graph. A vertex
    /// without outgoing arcs has no heads.
    pub fn get_heads(&self, vertex: &T) -> StrataResult<&[T]> {
        if !self.contains(vertex) {
            return Err(StrataError::not_found("vertex is not in the graph"));
        }
        Ok(self.try_get_heads(vertex).unwrap_or(&[]))
    }

    /// Tails of the arcs entering `vertex`.
    ///
    /// Fails with `NotFound` if `vertex` is not in the graph.
    pub fn get_tails(&self, vertex: &T) -> StrataResult<&[T]> {
        if !self.contains(vertex) {
            return Err(StrataError::not_found("vertex is not in the graph"));
        }
        Ok(self.try_get_tails(vertex).unwrap_or(&[]))
    }

    /// Heads of the arcs leaving `vertex`, or None when there are none.
    pub fn try_get_heads(&self, vertex: &T) -> Option<&[T]> {
        self.arcs
            .try_get_values_from_key1(vertex)
            .map(OrderedSet::as_slice)
    }

    pub fn try_get_tails(&self, vertex: &T) -> Option<&[T]> {
        self.arcs
            .try_get_values_from_key2(vertex)
            .map(OrderedSet::as_slice)
    }

    pub fn dfs(&self, root: T) -> StrataResult<GraphDfs<'_, Self>> {
        GraphDfs::new(self, root)
    }

    pub fn bfs(&self, root: T) -> StrataResult<GraphBfs<'_, Self>> {
        GraphBfs::new(self, root)
    }

    /// Breadth-first search from `root`, one distance layer at a time.
    pub fn bfs_layers(&self, root: T) -> StrataResult<GraphBfsLayers<'_, Self>> {
        GraphBfsLayers::new(self, [root])
    }

    /// Every vertex reachable from `root`, `root` included.
    pub fn reachable(&self, root: T) -> StrataResult<FxHashSet<T>> {
        Ok(self.bfs(root)?.worklist())
    }

    /// Spanning tree of the depth-first search from `root`.
    pub fn to_dfs_tree(&self, root: T) -> StrataResult<Tree<T>> {
        spanning::to_dfs_tree(self, root)
    }

    /// Spanning tree of the breadth-first search from `root`.
    pub fn to_bfs_tree(&self, root: T) -> StrataResult<Tree<T>> {
        spanning::to_bfs_tree(self, root)
    }
}

impl<T> Successors for DiGraph<T>
where
    T: Eq + Hash + Clone,
{
    type Vertex = T;

    type Successors<'a>
        = Iter<'a, T>
    where
        Self: 'a;

    fn has_vertex(&self, vertex: &T) -> bool {
        self.contains(vertex)
    }

    fn successors(&self, vertex: &T) -> Self::Successors<'_> {
        self.try_get_heads(vertex).unwrap_or(&[]).iter()
    }
}
