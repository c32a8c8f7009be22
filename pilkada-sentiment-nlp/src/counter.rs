use std::{collections::HashMap, hash::Hash};

/// Counts keys and remembers the order in which they were first seen.
#[derive(Debug, Clone)]
pub struct FrequencyCounter<K> {
    positions: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Hash + Eq + Clone> FrequencyCounter<K> {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        self.add_count(key, 1);
    }

    pub fn add_count(&mut self, key: K, count: usize) {
        match self.positions.get(&key) {
            Some(position) => self.entries[*position].1 += count,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<(K, usize)> {
        self.entries
    }

    /// Highest count first; equal counts stay in first-seen order.
    pub fn into_sorted(self) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K: Hash + Eq + Clone> Default for FrequencyCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for FrequencyCounter<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut counter = Self::new();
        iter.into_iter().for_each(|key| counter.add(key));
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_in_first_seen_order() {
        let counter: FrequencyCounter<&str> = "a a b".split(' ').collect();

        assert!(!counter.is_empty());
        assert_eq!(counter.into_entries(), vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn sorting_keeps_ties_stable() {
        let counter: FrequencyCounter<&str> = "c b a b c d".split(' ').collect();

        assert_eq!(counter.into_sorted(), vec![("c", 2), ("b", 2), ("a", 1), ("d", 1)]);
    }
}
