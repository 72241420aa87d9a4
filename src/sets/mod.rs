pub mod ordered;

pub use ordered::OrderedSet;
