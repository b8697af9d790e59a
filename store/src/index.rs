//! Indexes for efficient collection lookups.

use std::collections::HashMap;

/// Key index: `_id` -> position in the collection's document vector.
#[derive(Debug, Default, Clone)]
pub struct KeyIndex {
    index: HashMap<String, usize>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, position: usize) {
        self.index.insert(key.to_string(), position);
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove a key and shift every position after it down by one, matching
    /// a `Vec::remove` on the document vector.
    pub fn remove(&mut self, key: &str) -> Option<usize> {
        let removed = self.index.remove(key)?;
        for position in self.index.values_mut() {
            if *position > removed {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
