use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use xxhash_rust::xxh3::Xxh3Builder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub top_k: Vec<FrequencyEntry>,
}

/// exact value counts; each value remembers the row where it first appeared
pub struct FrequencyCounter {
    map: HashMap<String, (usize, u64), Xxh3Builder>,
    seen: usize,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(Xxh3Builder::new()),
            seen: 0,
        }
    }

    pub fn add(&mut self, val: &str) {
        let order = self.seen;
        self.seen += 1;
        match self.map.get_mut(val) {
            Some((_, count)) => *count += 1,
            None => {
                self.map.insert(val.to_owned(), (order, 1));
            }
        }
    }

    /// descending by count; equal counts keep first-encountered order
    pub fn top_n(self, n: usize) -> CategoricalStats {
        let mut entries: Vec<(String, (usize, u64))> = self.map.into_iter().collect();
        entries.sort_by(|a, b| b.1 .1.cmp(&a.1 .1).then(a.1 .0.cmp(&b.1 .0)));
        let top_k = entries
            .into_iter()
            .take(n)
            .map(|(value, (_, count))| FrequencyEntry { value, count })
            .collect();
        CategoricalStats { top_k }
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}
