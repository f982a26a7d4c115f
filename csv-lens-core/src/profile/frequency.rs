use super::cell::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use xxhash_rust::xxh3::Xxh3Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Missing is its own category in counts and cardinality
    Include,
    /// Missing cells are skipped entirely
    Exclude,
}

impl MissingPolicy {
    pub fn from_include(include_missing: bool) -> Self {
        if include_missing {
            Self::Include
        } else {
            Self::Exclude
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: Cell,
    pub count: u64,
}

struct Tally {
    count: u64,
    first_seen: usize,
}

/// Exact value -> count mapping that remembers first-occurrence order.
pub struct FrequencyCounter {
    map: HashMap<Cell, Tally, Xxh3Builder>,
    policy: MissingPolicy,
}

impl FrequencyCounter {
    pub fn new(policy: MissingPolicy) -> Self {
        Self {
            map: HashMap::with_hasher(Xxh3Builder::new()),
            policy,
        }
    }

    pub fn add(&mut self, cell: Cell) {
        if cell.is_missing() && self.policy == MissingPolicy::Exclude {
            return;
        }
        let next = self.map.len();
        self.map
            .entry(cell)
            .or_insert(Tally {
                count: 0,
                first_seen: next,
            })
            .count += 1;
    }

    pub fn distinct(&self) -> usize {
        self.map.len()
    }

    /// Every entry, count descending; ties keep first-occurrence order.
    pub fn finish(self) -> Vec<ValueCount> {
        let mut entries: Vec<(Cell, Tally)> = self.map.into_iter().collect();
        entries.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        entries
            .into_iter()
            .map(|(value, t)| ValueCount {
                value,
                count: t.count,
            })
            .collect()
    }
}

impl Extend<Cell> for FrequencyCounter {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        for cell in iter {
            self.add(cell);
        }
    }
}
