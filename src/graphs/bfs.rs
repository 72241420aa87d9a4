use rustc_hash::FxHashSet;

use crate::error::{StrataError, StrataResult};
use crate::graphs::frontier::LayeredFrontier;
use crate::graphs::successors::Successors;
use crate::graphs::visited::Visited;
use crate::graphs::worklist::Worklist;

/// Breadth-first search that yields whole distance layers.
///
/// The n-th item holds exactly the vertices at distance n from the nearest
/// initial vertex. Vertices are marked when discovered, so no vertex
/// appears in two layers and no layer holds a duplicate. Within a layer,
/// vertices appear in discovery order.
pub struct GraphBfsLayers<'g, G, V = FxHashSet<<G as Successors>::Vertex>>
where
    G: Successors,
    V: Visited<G::Vertex>,
{
    graph: &'g G,
    visited: V,
    frontier: LayeredFrontier<G::Vertex>,
}

impl<'g, G, V> GraphBfsLayers<'g, G, V>
where
    G: Successors,
    V: Visited<G::Vertex>,
{
    /// Starts from every vertex in `initials`; duplicates are ignored.
    ///
    /// Fails with `NotFound` if one of them is not a vertex of `graph`.
    pub fn new(graph: &'g G, initials: impl IntoIterator<Item = G::Vertex>) -> StrataResult<Self> {
        let mut visited = V::default();
        let mut first = Vec::new();

        for vertex in initials {
            if !graph.has_vertex(&vertex) {
                return Err(StrataError::not_found("search root is not a vertex"));
            }
            if visited.visit(vertex.clone()) {
                first.push(vertex);
            }
        }

        Ok(Self {
            graph,
            visited,
            frontier: LayeredFrontier::new(first),
        })
    }

    /// Vertices waiting in the next layer.
    pub fn pending(&self) -> &[G::Vertex] {
        self.frontier.layer()
    }
}

impl<'g, G, V> Iterator for GraphBfsLayers<'g, G, V>
where
    G: Successors,
    V: Visited<G::Vertex>,
{
    type Item = Vec<G::Vertex>;

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        let visited = &mut self.visited;

        self.frontier.step(|current, next| {
            for from in current {
                for to in graph.successors(from) {
                    if visited.visit(to.clone()) {
                        next.push(to.clone());
                    }
                }
            }

            debug_assert!(next.iter().all(|v| visited.is_visited(v)));
        })
    }
}

impl<'g, G, V> Worklist<G::Vertex, V> for GraphBfsLayers<'g, G, V>
where
    G: Successors,
    V: Visited<G::Vertex>,
{
    fn into_visited(self) -> V {
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    use bit_vec::BitVec;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::graphs::digraph::DiGraph;

    fn graph_from(vertices: usize, arcs: &[(usize, usize)]) -> DiGraph<usize> {
        let mut g = DiGraph::new();
        for v in 0..vertices {
            g.add(v);
        }
        for &(t, h) in arcs {
            g.try_add_arc(t, h);
        }
        g
    }

    #[test]
    fn layers_on_line_graph() {
        // 0 -> 1 -> 2 -> 3
        let g = graph_from(4, &[(0, 1), (1, 2), (2, 3)]);
        let layers: Vec<Vec<usize>> = g.bfs_layers(0).unwrap().collect();
        assert_eq!(layers, vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn layers_on_branching_graph_keep_discovery_order() {
        // 0 -> 2, 0 -> 1, 1 -> 3, 2 -> 3
        let g = graph_from(4, &[(0, 2), (0, 1), (1, 3), (2, 3)]);
        let layers: Vec<Vec<usize>> = g.bfs_layers(0).unwrap().collect();
        assert_eq!(layers, vec![vec![0], vec![2, 1], vec![3]]);
    }

    #[test]
    fn layers_with_cycle_terminate() {
        // 0 -> 1 -> 2 -> 1
        let g = graph_from(3, &[(0, 1), (1, 2), (2, 1)]);
        let mut bfs: GraphBfsLayers<DiGraph<usize>> = GraphBfsLayers::new(&g, [0]).unwrap();

        assert_eq!(bfs.pending(), &[0]);
        assert_eq!(bfs.next(), Some(vec![0]));
        assert_eq!(bfs.next(), Some(vec![1]));
        assert_eq!(bfs.next(), Some(vec![2]));
        assert_eq!(bfs.next(), None);

        let visited = bfs.into_visited();
        assert_eq!(visited.len(), 3);
    }

    #[test]
    fn multiple_initials_share_the_first_layer() {
        // Component A: 0 -> 1, component B: 2 -> 3
        let g = graph_from(4, &[(0, 1), (2, 3)]);
        let bfs: GraphBfsLayers<DiGraph<usize>> = GraphBfsLayers::new(&g, [2, 0, 2]).unwrap();
        let layers: Vec<Vec<usize>> = bfs.collect();
        assert_eq!(layers, vec![vec![2, 0], vec![3, 1]]);
    }

    #[test]
    fn unknown_initial_is_not_found() {
        let g = graph_from(2, &[]);
        let result: StrataResult<GraphBfsLayers<DiGraph<usize>>> = GraphBfsLayers::new(&g, [0, 7]);
        assert!(result.err().is_some_and(|e| e.is_not_found()));
    }

    #[test]
    fn bitvec_and_hash_visited_reach_the_same_set() {
        let g = graph_from(6, &[(0, 1), (1, 2), (2, 0), (4, 5)]);

        let hashed: FxHashSet<usize> =
            GraphBfsLayers::<DiGraph<usize>>::new(&g, [0]).unwrap().worklist();
        let bits: BitVec = GraphBfsLayers::<DiGraph<usize>, BitVec>::new(&g, [0])
            .unwrap()
            .worklist();

        for v in 0..6 {
            assert_eq!(hashed.is_visited(&v), bits.is_visited(&v));
        }
        assert_eq!(hashed.len(), 3);
    }

    // Random arc lists over 16 vertices.
    prop_compose! {
        fn random_arc_list()
            (arcs in prop::collection::vec((0usize..16, 0usize..16), 0..=64))
            -> Vec<(usize, usize)>
        {
            arcs
        }
    }

    proptest! {
        // Layer index must equal shortest-path distance from the initials.
        #[test]
        fn prop_layers_match_shortest_paths(
            arcs in random_arc_list(),
            initials in prop::collection::vec(0usize..16, 1..=4),
        ) {
            let g = graph_from(16, &arcs);

            let layers: Vec<Vec<usize>> =
                GraphBfsLayers::<DiGraph<usize>>::new(&g, initials.iter().copied())
                    .unwrap()
                    .collect();

            let mut dist: HashMap<usize, usize> = HashMap::new();
            let mut queue = VecDeque::new();
            for &s in &initials {
                if !dist.contains_key(&s) {
                    dist.insert(s, 0);
                    queue.push_back(s);
                }
            }
            while let Some(u) = queue.pop_front() {
                let du = dist[&u];
                for v in g.successors(&u) {
                    if !dist.contains_key(v) {
                        dist.insert(*v, du + 1);
                        queue.push_back(*v);
                    }
                }
            }

            let mut seen = 0;
            for (i, layer) in layers.iter().enumerate() {
                prop_assert!(!layer.is_empty());
                for v in layer {
                    prop_assert_eq!(dist.get(v), Some(&i), "vertex {} in wrong layer", v);
                    seen += 1;
                }
            }
            prop_assert_eq!(seen, dist.len());
        }
    }

    #[test]
    fn random_stress_layers_partition_reachable_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x_4C41_5945_5253);

        for _case in 0..100 {
            let n = rng.random_range(1..=12usize);
            let arcs: Vec<(usize, usize)> = (0..rng.random_range(0..=40))
                .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
                .collect();
            let g = graph_from(n, &arcs);
            let root = rng.random_range(0..n);

            let flattened: Vec<usize> = g.bfs_layers(root).unwrap().flatten().collect();
            let reachable = g.reachable(root).unwrap();

            assert_eq!(flattened.len(), reachable.len());
            assert!(flattened.iter().all(|v| reachable.contains(v)));
        }
    }
}
