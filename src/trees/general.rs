use std::fmt;
use std::iter::Copied;
use std::slice::Iter;

use tracing::debug;

use crate::error::{StrataError, StrataResult};
use crate::mem::arena::{Arena, NodeId};
use crate::trees::hierarchy::{self, Hierarchy, TreeBfs, TreeDfs};

#[derive(Debug, Clone)]
struct NodeData<T> {
    value: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> NodeData<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Rooted tree with an ordered, unbounded list of children per node.
///
/// The tree owns all of its nodes. A node refers to its children and to its
/// parent by [`NodeId`]; the parent link is only a lookup aid and is kept in
/// sync automatically: it is set when a node is attached and cleared when it
/// is removed. A node has at most one parent, and the root never has one.
///
/// Nodes can also exist detached, either freshly created with
/// [`Tree::new_node`] or after [`Tree::remove`]. A detached node keeps its
/// own subtree and can be attached again later, or dropped with
/// [`Tree::delete`].
///
/// Every method that takes a `NodeId` fails with `InvalidArgument` when the
/// id does not name a live node of this tree.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Arena<NodeData<T>>,
    root: NodeId,
}

impl<T> Tree<T> {
    pub fn new(value: T) -> Self {
        Self::with_capacity(value, 1)
    }

    pub fn with_capacity(value: T, capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.max(1));
        let root = nodes.insert(NodeData::new(value));
        Self { nodes, root }
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

    fn node(&self, id: NodeId) -> StrataResult<&NodeData<T>> {
        self.nodes
            .get(id)
            .ok_or_else(|| StrataError::invalid_argument(format!("{id:?} is not a node of this tree")))
    }

    fn node_mut(&mut self, id: NodeId) -> StrataResult<&mut NodeData<T>> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| StrataError::invalid_argument(format!("{id:?} is not a node of this tree")))
    }

    pub fn get(&self, id: NodeId) -> StrataResult<NodeRef<'_, T>> {
        let data = self.node(id)?;
        Ok(NodeRef {
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

    pub fn parent(&self, id: NodeId) -> StrataResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> StrataResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn child_count(&self, id: NodeId) -> StrataResult<usize> {
        Ok(self.node(id)?.children.len())
    }

    pub fn is_leaf(&self, id: NodeId) -> StrataResult<bool> {
        Ok(self.node(id)?.children.is_empty())
    }

    pub fn new_node(&mut self, value: T) -> NodeId {
        self.nodes.insert(NodeData::new(value))
    }

    /// Appends a new child holding `value` to `parent`.
    pub fn add(&mut self, parent: NodeId, value: T) -> StrataResult<NodeId> {
        let index = self.child_count(parent)?;
        self.insert(parent, index, value)
    }

    /// Inserts a new child holding `value` at position `index` of `parent`.
    ///
    /// Fails with `InvalidArgument` if `index` exceeds the child count.
    pub fn insert(&mut self, parent: NodeId, index: usize, value: T) -> StrataResult<NodeId> {
        let count = self.child_count(parent)?;
        crate::ensure!(index <= count, InvalidArgument: "index {} out of range 0..={}", index, count);

        let child = self.nodes.insert(NodeData::new(value));
        self.link(parent, index, child)?;
        Ok(child)
    }

    /// Appends an existing detached node to `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> StrataResult<()> {
        let index = self.child_count(parent)?;
        self.insert_node(parent, index, child)
    }

    /// Inserts an existing detached node at position `index` of `parent`.
    ///
    /// Fails with `Conflict` if `child` already has a parent, is the root,
    /// or is an ancestor of `parent` (attaching it would close a cycle).
    pub fn insert_node(&mut self, parent: NodeId, index: usize, child: NodeId) -> StrataResult<()> {
        let count = self.child_count(parent)?;
        crate::ensure!(index <= count, InvalidArgument: "index {} out of range 0..={}", index, count);

        if self.node(child)?.parent.is_some() {
            return Err(StrataError::conflict("node already has a parent"));
        }
        if child == self.root {
            return Err(StrataError::conflict("the root cannot become a child"));
        }
        if self.ancestors_and_self(parent).any(|id| id == child) {
            return Err(StrataError::conflict("attaching the node would create a cycle"));
        }

        self.link(parent, index, child)
    }

    fn link(&mut self, parent: NodeId, index: usize, child: NodeId) -> StrataResult<()> {
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.insert(index, child);
        Ok(())
    }

    /// Walks from `id` up to the top of its tree.
    fn ancestors_and_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |current| {
            self.nodes.get(*current).and_then(|data| data.parent)
        })
    }

    /// Detaches `child` from `parent`.
    ///
    /// Returns false when `child` is not a child of `parent`. The detached
    /// node keeps its subtree and its arena slots; `node_count` still counts
    /// them until `child` is reattached or passed to [`Tree::delete`].
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> StrataResult<bool> {
        self.node(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let Some(position) = children.iter().position(|id| *id == child) else {
            return Ok(false);
        };
        children.remove(position);
        self.node_mut(child)?.parent = None;
        Ok(true)
    }

    /// Detaches `id` from whatever parent it has.
    ///
    /// Returns false if it was already detached.
    pub fn detach(&mut self, id: NodeId) -> StrataResult<bool> {
        match self.node(id)?.parent {
            Some(parent) => self.remove(parent, id),
            None => Ok(false),
        }
    }

    pub fn contains(&self, parent: NodeId, child: NodeId) -> StrataResult<bool> {
        Ok(self.node(parent)?.children.contains(&child))
    }

    /// Detaches every child of `parent` and returns them in their former
    /// order.
    ///
    /// The returned subtrees stay allocated. Pass each id to
    /// [`Tree::delete`], or use [`Tree::prune`], to free them.
    pub fn clear(&mut self, parent: NodeId) -> StrataResult<Vec<NodeId>> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in &children {
            if let Some(data) = self.nodes.get_mut(*child) {
                data.parent = None;
            }
        }
        Ok(children)
    }

    /// Detaches every child of `parent` and frees their subtrees.
    ///
    /// Returns the number of nodes freed.
    pub fn prune(&mut self, parent: NodeId) -> StrataResult<usize> {
        let children = self.clear(parent)?;
        let freed = children.into_iter().map(|child| self.free_subtree(child)).sum();

        debug!(?parent, freed, "pruned children");
        Ok(freed)
    }

    /// Detaches `id` and frees it together with its whole subtree.
    ///
    /// Returns the number of nodes freed. The root cannot be deleted.
    pub fn delete(&mut self, id: NodeId) -> StrataResult<usize> {
        if id == self.root {
            return Err(StrataError::invalid_argument("the root cannot be deleted"));
        }
        self.detach(id)?;
        let freed = self.free_subtree(id);

        debug!(?id, freed, "deleted subtree");
        Ok(freed)
    }

    fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.nodes.remove(current) {
                stack.extend(data.children);
                freed += 1;
            }
        }
        freed
    }

    /// Number of levels below and including `id`; a leaf has depth 1.
    pub fn depth(&self, id: NodeId) -> StrataResult<usize> {
        hierarchy::depth(self, id)
    }

    /// Depth-first walk of the subtree at `start`, parents before children.
    pub fn dfs(&self, start: NodeId) -> StrataResult<impl Iterator<Item = NodeRef<'_, T>> + '_> {
        Ok(TreeDfs::new(self, start)?.filter_map(move |id| self.get(id).ok()))
    }

    /// Breadth-first walk of the subtree at `start`, level by level.
    pub fn bfs(&self, start: NodeId) -> StrataResult<impl Iterator<Item = NodeRef<'_, T>> + '_> {
        Ok(TreeBfs::new(self, start)?.filter_map(move |id| self.get(id).ok()))
    }
}

impl<T> Hierarchy for Tree<T> {
    type Node = NodeId;

    type Children<'a>
        = Copied<Iter<'a, NodeId>>
    where
        Self: 'a;

    fn has_node(&self, node: NodeId) -> bool {
        self.nodes.contains(node)
    }

    fn children(&self, node: NodeId) -> Self::Children<'_> {
        let children: &[NodeId] = match self.nodes.get(node) {
            Some(data) => &data.children,
            None => &[],
        };
        children.iter().copied()
    }
}

/// Borrowed view of one node, handed out by lookups and traversals.
pub struct NodeRef<'t, T> {
    tree: &'t Tree<T>,
    id: NodeId,
    data: &'t NodeData<T>,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'t, T> NodeRef<'t, T> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn value(&self) -> &'t T {
        &self.data.value
    }

    pub fn parent(&self) -> Option<NodeRef<'t, T>> {
        self.data.parent.and_then(|id| self.tree.get(id).ok())
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t, T>> + 't {
        let tree = self.tree;
        self.data
            .children
            .iter()
            .filter_map(move |id| tree.get(*id).ok())
    }

    pub fn child_count(&self) -> usize {
        self.data.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.data.children.is_empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("value", &self.data.value)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    /// Renders the attached tree as an outline:
    ///
    /// ```text
    /// root
    /// ├─ a
    /// │  └─ g
    /// └─ b
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.node(self.root).map_err(|_| fmt::Error)?;
        writeln!(f, "{}", root.value)?;

        // (node, prefix inherited from the ancestors, last among siblings)
        let mut stack: Vec<(NodeId, String, bool)> = Vec::new();
        let push_children = |stack: &mut Vec<(NodeId, String, bool)>, children: &[NodeId], prefix: &str| {
            let last = children.len().saturating_sub(1);
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((*child, prefix.to_string(), i == last));
            }
        };
        push_children(&mut stack, &root.children, "");

        while let Some((id, prefix, is_last)) = stack.pop() {
            let Some(data) = self.nodes.get(id) else {
                continue;
            };
            let connector = if is_last { "└─ " } else { "├─ " };
            writeln!(f, "{prefix}{connector}{}", data.value)?;

            let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
            push_children(&mut stack, &data.children, &child_prefix);
        }

        Ok(())
    }
}
