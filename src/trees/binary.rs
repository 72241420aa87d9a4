use std::array::IntoIter;
use std::fmt;
use std::iter::Flatten;

use tracing::debug;

use crate::error::{StrataError, StrataResult};
use crate::mem::arena::{Arena, NodeId};
use crate::trees::hierarchy::{self, Hierarchy, TreeBfs, TreeDfs};

#[derive(Debug, Clone)]
struct BinaryNodeData<T> {
    value: T,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Rooted tree in which every node has an optional left and right child.
///
/// Nodes live in an arena owned by the tree and are addressed by
/// [`NodeId`]. Replacing a child through [`BinaryTree::set_left`] or
/// [`BinaryTree::set_right`] clears the old child's parent link and sets the
/// new child's one, so the two directions always agree.
///
/// Unbalanced by construction: the shape is exactly what the caller built.
#[derive(Debug, Clone)]
pub struct BinaryTree<T> {
    nodes: Arena<BinaryNodeData<T>>,
    root: NodeId,
}

impl<T> From<T> for BinaryTree<T> {
    /// A bare value becomes a single-node tree.
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> BinaryTree<T> {
    pub fn new(value: T) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Self::leaf(value));
        Self { nodes, root }
    }

    fn leaf(value: T) -> BinaryNodeData<T> {
        BinaryNodeData {
            value,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    fn node(&self, id: NodeId) -> StrataResult<&BinaryNodeData<T>> {
        self.nodes
            .get(id)
            .ok_or_else(|| StrataError::invalid_argument(format!("{id:?} is not a node of this tree")))
    }

    fn node_mut(&mut self, id: NodeId) -> StrataResult<&mut BinaryNodeData<T>> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| StrataError::invalid_argument(format!("{id:?} is not a node of this tree")))
    }

    pub fn get(&self, id: NodeId) -> StrataResult<BinaryNodeRef<'_, T>> {
        let data = self.node(id)?;
        Ok(BinaryNodeRef {
            tree: self,
            id,
            data,
        })
    }

    pub fn value(&self, id: NodeId) -> StrataResult<&T> {
        Ok(&self.node(id)?.value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> StrataResult<&mut T> {
        Ok(&mut self.node_mut(id)?.value)
    }

    pub fn set_value(&mut self, id: NodeId, value: T) -> StrataResult<T> {
        Ok(std::mem::replace(&mut self.node_mut(id)?.value, value))
    }

    pub fn left(&self, id: NodeId) -> StrataResult<Option<NodeId>> {
        Ok(self.node(id)?.left)
    }

    pub fn right(&self, id: NodeId) -> StrataResult<Option<NodeId>> {
        Ok(self.node(id)?.right)
    }

    pub fn parent(&self, id: NodeId) -> StrataResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Creates a detached node, ready to be passed to `set_left`/`set_right`.
    pub fn new_node(&mut self, value: T) -> NodeId {
        self.nodes.insert(Self::leaf(value))
    }

    /// Makes `child` the left child of `node`, returning the previous one.
    ///
    /// The previous child, if any, is detached but kept with its subtree.
    /// `child` must be detached, must not be the root, and must not be an
    /// ancestor of `node`; otherwise the call fails with `Conflict`.
    pub fn set_left(&mut self, node: NodeId, child: Option<NodeId>) -> StrataResult<Option<NodeId>> {
        self.set_child(node, Side::Left, child)
    }

    /// Makes `child` the right child of `node`, returning the previous one.
    ///
    /// Same rules as [`BinaryTree::set_left`].
    pub fn set_right(&mut self, node: NodeId, child: Option<NodeId>) -> StrataResult<Option<NodeId>> {
        self.set_child(node, Side::Right, child)
    }

    /// Creates a node holding `value` and makes it the left child of `node`.
    ///
    /// Returns the new node; a previous left child is detached.
    pub fn insert_left(&mut self, node: NodeId, value: T) -> StrataResult<NodeId> {
        self.node(node)?;
        let child = self.new_node(value);
        self.set_child(node, Side::Left, Some(child))?;
        Ok(child)
    }

    pub fn insert_right(&mut self, node: NodeId, value: T) -> StrataResult<NodeId> {
        self.node(node)?;
        let child = self.new_node(value);
        self.set_child(node, Side::Right, Some(child))?;
        Ok(child)
    }

    fn set_child(
        &mut self,
        node: NodeId,
        side: Side,
        child: Option<NodeId>,
    ) -> StrataResult<Option<NodeId>> {
        let current = self.node(node)?;
        let previous = match side {
            Side::Left => current.left,
            Side::Right => current.right,
        };

        if child.is_some() && child == previous {
            return Ok(previous);
        }

        if let Some(child) = child {
            if self.node(child)?.parent.is_some() {
                return Err(StrataError::conflict("node already has a parent"));
            }
            if child == self.root {
                return Err(StrataError::conflict("the root cannot become a child"));
            }
            let mut cursor = Some(node);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(StrataError::conflict("attaching the node would create a cycle"));
                }
                cursor = self.nodes.get(ancestor).and_then(|data| data.parent);
            }
        }

        // All checks passed, nothing below can fail.
        if let Some(old) = previous.and_then(|id| self.nodes.get_mut(id)) {
            old.parent = None;
        }
        if let Some(new) = child.and_then(|id| self.nodes.get_mut(id)) {
            new.parent = Some(node);
        }
        if let Some(data) = self.nodes.get_mut(node) {
            match side {
                Side::Left => data.left = child,
                Side::Right => data.right = child,
            }
        }

        Ok(previous)
    }

    /// Detaches `id` from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) -> StrataResult<bool> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(false);
        };
        let side = if self.node(parent)?.left == Some(id) {
            Side::Left
        } else {
            Side::Right
        };
        self.set_child(parent, side, None)?;
        Ok(true)
    }

    /// Detaches `id` and frees it together with its subtree.
    ///
    /// Returns the number of nodes freed. The root cannot be deleted.
    pub fn delete(&mut self, id: NodeId) -> StrataResult<usize> {
        if id == self.root {
            return Err(StrataError::invalid_argument("the root cannot be deleted"));
        }
        self.detach(id)?;

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.nodes.remove(current) {
                stack.extend(data.left);
                stack.extend(data.right);
                freed += 1;
            }
        }

        debug!(?id, freed, "deleted binary subtree");
        Ok(freed)
    }

    /// Number of levels below and including `id`; a leaf has depth 1.
    pub fn depth(&self, id: NodeId) -> StrataResult<usize> {
        hierarchy::depth(self, id)
    }

    /// Node, then left subtree, then right subtree.
    pub fn preorder(&self, start: NodeId) -> StrataResult<PreOrder<'_, T>> {
        TreeDfs::new(self, start)
    }

    /// Left subtree, then node, then right subtree.
    pub fn inorder(&self, start: NodeId) -> StrataResult<InOrder<'_, T>> {
        self.node(start)?;
        Ok(InOrder {
            tree: self,
            stack: Vec::new(),
            current: Some(start),
        })
    }

    /// Left subtree, then right subtree, then node.
    pub fn postorder(&self, start: NodeId) -> StrataResult<PostOrder<'_, T>> {
        self.node(start)?;
        Ok(PostOrder {
            tree: self,
            stack: vec![start],
            previous: None,
        })
    }

    /// Level by level from `start`, each level left to right.
    pub fn levelorder(&self, start: NodeId) -> StrataResult<LevelOrder<'_, T>> {
        TreeBfs::new(self, start)
    }

    /// Values of a traversal, for when node ids are not needed.
    pub fn values<'t, I>(&'t self, order: I) -> impl Iterator<Item = &'t T> + 't
    where
        I: IntoIterator<Item = NodeId>,
        I::IntoIter: 't,
    {
        order
            .into_iter()
            .filter_map(move |id| self.nodes.get(id).map(|data| &data.value))
    }
}

impl<T> Hierarchy for BinaryTree<T> {
    type Node = NodeId;

    type Children<'a>
        = Flatten<IntoIter<Option<NodeId>, 2>>
    where
        Self: 'a;

    fn has_node(&self, node: NodeId) -> bool {
        self.nodes.contains(node)
    }

    fn children(&self, node: NodeId) -> Self::Children<'_> {
        let pair = match self.nodes.get(node) {
            Some(data) => [data.left, data.right],
            None => [None, None],
        };
        pair.into_iter().flatten()
    }
}

/// Pre-order walk: the generic depth-first search pushes the right child
/// below the left one, so the left subtree is finished first.
pub type PreOrder<'t, T> = TreeDfs<'t, BinaryTree<T>>;

/// Level-order walk: the generic breadth-first search enqueues left before
/// right.
pub type LevelOrder<'t, T> = TreeBfs<'t, BinaryTree<T>>;

/// In-order walk.
///
/// `current` roams down left spines pushing every node it passes; when it
/// runs out, the top of the stack is yielded and `current` moves to that
/// node's right child.
pub struct InOrder<'t, T> {
    tree: &'t BinaryTree<T>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<T> Iterator for InOrder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.current {
            self.stack.push(node);
            self.current = self.tree.nodes.get(node).and_then(|data| data.left);
        }

        let node = self.stack.pop()?;
        self.current = self.tree.nodes.get(node).and_then(|data| data.right);
        Some(node)
    }
}

/// Post-order walk.
///
/// The stack holds nodes whose subtrees are still open. The top is only
/// popped once it is a leaf or the node yielded just before it is its last
/// child; otherwise its children are pushed (right first) and the node
/// stays on the stack until they are done.
pub struct PostOrder<'t, T> {
    tree: &'t BinaryTree<T>,
    stack: Vec<NodeId>,
    previous: Option<NodeId>,
}

impl<T> Iterator for PostOrder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = *self.stack.last()?;
            let (left, right) = match self.tree.nodes.get(top) {
                Some(data) => (data.left, data.right),
                None => (None, None),
            };

            let is_leaf = left.is_none() && right.is_none();
            // The right subtree finishes last, unless there is none.
            let last_child = right.or(left);
            let children_done = self.previous.is_some() && self.previous == last_child;

            if is_leaf || children_done {
                self.stack.pop();
                self.previous = Some(top);
                return Some(top);
            }

            self.stack.extend(right);
            self.stack.extend(left);
        }
    }
}

/// Borrowed view of one binary tree node.
pub struct BinaryNodeRef<'t, T> {
    tree: &'t BinaryTree<T>,
    id: NodeId,
    data: &'t BinaryNodeData<T>,
}

impl<T> Clone for BinaryNodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BinaryNodeRef<'_, T> {}

impl<'t, T> BinaryNodeRef<'t, T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'t T {
        &self.data.value
    }

    pub fn left(&self) -> Option<BinaryNodeRef<'t, T>> {
        self.data.left.and_then(|id| self.tree.get(id).ok())
    }

    pub fn right(&self) -> Option<BinaryNodeRef<'t, T>> {
        self.data.right.and_then(|id| self.tree.get(id).ok())
    }

    pub fn parent(&self) -> Option<BinaryNodeRef<'t, T>> {
        self.data.parent.and_then(|id| self.tree.get(id).ok())
    }

    pub fn is_leaf(&self) -> bool {
        self.data.left.is_none() && self.data.right.is_none()
    }
}

impl<T: fmt::Debug> fmt::Debug for BinaryNodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryNodeRef")
            .field("id", &self.id)
            .field("value", &self.data.value)
            .finish()
    }
}
