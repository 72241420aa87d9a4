pub mod key_pair;
pub mod multi;
pub mod unique;

pub use key_pair::KeyPair;
pub use multi::MultiBiMap;
pub use unique::{Comparer, DefaultComparer, UniqueBiMap};
