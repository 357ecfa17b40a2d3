//! Insertion-ordered frequency counting.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// The most frequent value of a column and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

/// Counts values while remembering the order each was first seen.
///
/// Ties are always resolved in favour of the value seen first, so results
/// do not depend on hash iteration order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-count value; the earliest-seen wins a tie.
    pub fn mode(&self) -> Option<Popular<K>> {
        let mut best: Option<&(K, usize)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, n)| Popular {
            value: k.clone(),
            count: *n,
        })
    }

    /// All values by descending count, ties in first-seen order.
    pub fn distribution(&self) -> Vec<Popular<K>> {
        let mut out: Vec<Popular<K>> = self
            .entries
            .iter()
            .map(|(k, n)| Popular {
                value: k.clone(),
                count: *n,
            })
            .collect();
        // sort_by is stable
        out.sort_by(|a, b| b.count.cmp(&a.count));
        out
    }

    /// Re-keys the table, e.g. to turn borrowed keys into owned or named ones.
    pub fn map_keys<J: Eq + Hash + Clone>(&self, f: impl Fn(&K) -> J) -> FrequencyTable<J> {
        let mut out = FrequencyTable::new();
        for (k, n) in &self.entries {
            let key = f(k);
            match out.index.get(&key) {
                Some(&slot) => out.entries[slot].1 += n,
                None => {
                    out.index.insert(key.clone(), out.entries.len());
                    out.entries.push((key, *n));
                }
            }
        }
        out
    }
}

impl<K: Eq + Hash + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_prefers_first_seen_on_tie() {
        let table: FrequencyTable<&str> = ["b", "a", "a", "b", "c"].into_iter().collect();
        assert_eq!(table.mode(), Some(Popular { value: "b", count: 2 }));
    }

    #[test]
    fn test_mode_of_empty_table() {
        let table: FrequencyTable<u32> = FrequencyTable::new();
        assert_eq!(table.mode(), None);
        assert!(table.distribution().is_empty());
    }

    #[test]
    fn test_distribution_order() {
        let table: FrequencyTable<u32> = [3, 1, 2, 2, 1, 2].into_iter().collect();
        let dist: Vec<_> = table.distribution().into_iter().map(|p| (p.value, p.count)).collect();
        assert_eq!(dist, [(2, 3), (1, 2), (3, 1)]);
    }

    #[test]
    fn test_map_keys_merges_collisions() {
        let table: FrequencyTable<u32> = [1, 2, 3, 3].into_iter().collect();
        let parity = table.map_keys(|n| n % 2);
        assert_eq!(
            parity.distribution(),
            [Popular { value: 1, count: 3 }, Popular { value: 0, count: 1 }]
        );
        assert_eq!(parity.mode(), Some(Popular { value: 1, count: 3 }));
    }
}
