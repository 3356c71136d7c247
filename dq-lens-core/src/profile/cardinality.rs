use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// exact distinct count over the rendered form of each non-null value
pub struct DistinctCounter {
    set: HashSet<String, Xxh3Builder>,
}

impl DistinctCounter {
    pub fn new() -> Self {
        Self {
            set: HashSet::with_hasher(Xxh3Builder::new()),
        }
    }

    pub fn add(&mut self, val: String) {
        self.set.insert(val);
    }

    pub fn count(&self) -> u64 {
        self.set.len() as u64
    }
}

impl Default for DistinctCounter {
    fn default() -> Self {
        Self::new()
    }
}
