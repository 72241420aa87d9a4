pub mod binary;
pub mod general;
pub mod hierarchy;

pub use binary::{BinaryNodeRef, BinaryTree};
pub use general::{NodeRef, Tree};
pub use hierarchy::{depth, Hierarchy, TreeBfs, TreeDfs, TreeSearch};

pub use crate::mem::arena::NodeId;
