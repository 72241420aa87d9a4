//! Graph, tree and bidirectional map containers.
//!
//! - [`graphs::DiGraph`]: directed graph over arbitrary vertex values, with
//!   lazy depth-first and breadth-first searches and spanning trees.
//! - [`trees::Tree`] and [`trees::BinaryTree`]: arena-backed rooted trees
//!   addressed by [`trees::NodeId`].
//! - [`maps::UniqueBiMap`] and [`maps::MultiBiMap`]: relations that can be
//!   queried from either side.
//!
//! Every fallible operation returns a [`StrataResult`]. Traversals keep
//! explicit stacks and queues, so deep structures do not exhaust the call
//! stack.

pub mod error;
pub mod graphs;
pub mod maps;
pub mod mem;
pub mod sets;
pub mod trees;

pub use error::{StrataError, StrataResult};
