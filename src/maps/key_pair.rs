/// An ordered `(key1, key2)` association stored by the bidirectional maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyPair<K1, K2> {
    pub key1: K1,
    pub key2: K2,
}

impl<K1, K2> KeyPair<K1, K2> {
    pub fn new(key1: K1, key2: K2) -> Self {
        Self { key1, key2 }
    }

    pub fn into_tuple(self) -> (K1, K2) {
        (self.key1, self.key2)
    }
}

impl<K1, K2> From<(K1, K2)> for KeyPair<K1, K2> {
    fn from((key1, key2): (K1, K2)) -> Self {
        Self { key1, key2 }
    }
}

impl<K1, K2> From<KeyPair<K1, K2>> for (K1, K2) {
    fn from(pair: KeyPair<K1, K2>) -> Self {
        pair.into_tuple()
    }
}
