use std::collections::VecDeque;

use crate::error::{StrataError, StrataResult};
use crate::graphs::frontier::Frontier;

/// Structural access to a rooted, acyclic hierarchy.
///
/// The generic tree algorithms below only need to know which nodes exist and
/// what the children of a node are. Both [`Tree`] and [`BinaryTree`]
/// implement it.
///
/// [`Tree`]: crate::trees::Tree
/// [`BinaryTree`]: crate::trees::BinaryTree
pub trait Hierarchy {
    type Node: Copy + Eq;

    type Children<'a>: Iterator<Item = Self::Node>
    where
        Self: 'a;

    /// Returns true when `node` is a live node of this hierarchy.
    fn has_node(&self, node: Self::Node) -> bool;

    /// Children of `node`, in order. Empty for a leaf or an unknown node.
    fn children(&self, node: Self::Node) -> Self::Children<'_>;
}

/// Lazy walk over the subtree below a start node.
///
/// Trees have no cycles, so unlike the graph searches there is no visited
/// store. Each call to a constructor walks the subtree afresh.
pub struct TreeSearch<'t, H, F>
where
    H: Hierarchy,
    F: Frontier<H::Node>,
{
    tree: &'t H,
    frontier: F,
}

/// Depth-first, parent before children, children left to right.
pub type TreeDfs<'t, H> = TreeSearch<'t, H, Vec<<H as Hierarchy>::Node>>;

/// Breadth-first, level by level, each level left to right.
pub type TreeBfs<'t, H> = TreeSearch<'t, H, VecDeque<<H as Hierarchy>::Node>>;

impl<'t, H, F> TreeSearch<'t, H, F>
where
    H: Hierarchy,
    F: Frontier<H::Node>,
{
    /// Fails with `InvalidArgument` if `start` is not a node of `tree`.
    pub fn new(tree: &'t H, start: H::Node) -> StrataResult<Self> {
        if !tree.has_node(start) {
            return Err(StrataError::invalid_argument(
                "start node does not belong to the tree",
            ));
        }

        let mut frontier = F::default();
        frontier.push(start);
        Ok(Self { tree, frontier })
    }
}

impl<'t, H, F> Iterator for TreeSearch<'t, H, F>
where
    H: Hierarchy,
    F: Frontier<H::Node>,
{
    type Item = H::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.frontier.pop()?;
        self.frontier.push_batch(self.tree.children(node));
        Some(node)
    }
}

/// Number of levels in the subtree rooted at `start`.
///
/// A leaf has depth 1, any other node one more than its deepest child. The
/// walk keeps its own stack, so arbitrarily deep trees are fine.
pub fn depth<H: Hierarchy>(tree: &H, start: H::Node) -> StrataResult<usize> {
    if !tree.has_node(start) {
        return Err(StrataError::invalid_argument(
            "start node does not belong to the tree",
        ));
    }

    let mut deepest = 0;
    let mut stack = vec![(start, 1usize)];

    while let Some((node, level)) = stack.pop() {
        deepest = deepest.max(level);
        stack.extend(tree.children(node).map(|child| (child, level + 1)));
    }

    Ok(deepest)
}
