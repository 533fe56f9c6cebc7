//! Identifier → label mapping with discovery order preserved

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node identifier → display label, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(u64, String)>", into = "Vec<(u64, String)>")]
pub struct IdentifierLabelMap {
    entries: Vec<(u64, String)>,
    positions: HashMap<u64, usize>,
}

impl IdentifierLabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, label)` pairs in discovery order.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (id, label) in pairs {
            map.insert(id, label);
        }
        map
    }

    /// Insert or relabel. A relabelled id keeps its original position.
    pub fn insert(&mut self, id: u64, label: impl Into<String>) {
        let label = label.into();
        match self.positions.get(&id) {
            Some(&pos) => self.entries[pos].1 = label,
            None => {
                self.positions.insert(id, self.entries.len());
                self.entries.push((id, label));
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<&str> {
        self.positions
            .get(&id)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, &str)> + '_ {
        self.entries.iter().map(|(id, label)| (*id, label.as_str()))
    }
}

impl From<Vec<(u64, String)>> for IdentifierLabelMap {
    fn from(pairs: Vec<(u64, String)>) -> Self {
        Self::from_pairs(pairs)
    }
}

impl From<IdentifierLabelMap> for Vec<(u64, String)> {
    fn from(map: IdentifierLabelMap) -> Self {
        map.entries
    }
}

impl<S: Into<String>> FromIterator<(u64, S)> for IdentifierLabelMap {
    fn from_iter<I: IntoIterator<Item = (u64, S)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
