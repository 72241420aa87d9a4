pub mod bfs;
pub mod digraph;
pub mod frontier;
pub mod search;
pub mod spanning;
pub mod successors;
pub mod visited;
pub mod worklist;

pub use bfs::GraphBfsLayers;
pub use digraph::DiGraph;
pub use search::{GraphBfs, GraphDfs, GraphSearch};
pub use spanning::{to_bfs_tree, to_dfs_tree};
pub use successors::Successors;
pub use visited::Visited;
pub use worklist::Worklist;
