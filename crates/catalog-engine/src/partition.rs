//! Grouped view: filtered records split by a partition key, with
//! per-partition expand/collapse state.

use std::collections::{BTreeMap, HashMap};

use catalog_model::Record;

use crate::filter::FilteredSet;

/// Key of the partition holding records that lack the partition field.
pub const UNPARTITIONED_KEY: &str = "";

/// One group of the filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: String,
    /// Indices into the collection store, in filtered order.
    pub indices: Vec<usize>,
}

/// The partition key of a record, as displayed.
pub fn partition_key(record: &Record, field: &str) -> String {
    record
        .get(field)
        .map_or_else(|| UNPARTITIONED_KEY.to_string(), ToString::to_string)
}

/// Split `filtered` by `field`. Partitions come back sorted by key.
pub fn group(records: &[Record], filtered: &FilteredSet, field: &str) -> Vec<Partition> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for &index in filtered.indices() {
        groups
            .entry(partition_key(&records[index], field))
            .or_default()
            .push(index);
    }
    groups
        .into_iter()
        .map(|(key, indices)| Partition { key, indices })
        .collect()
}

/// Expand/collapse flags keyed by partition key.
///
/// A key with no entry is expanded. Entries are only written by toggles,
/// so partitions that appear later in the session start expanded too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionExpansion {
    flags: HashMap<String, bool>,
}

impl PartitionExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(true)
    }

    /// Explicit flag for `key`, `None` when it follows the default.
    pub fn explicit(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    /// Flip one partition and return its new state.
    pub fn toggle(&mut self, key: &str) -> bool {
        let expanded = !self.is_expanded(key);
        self.flags.insert(key.to_string(), expanded);
        expanded
    }

    /// Make every present partition uniform.
    ///
    /// Collapses all when every present key is explicitly expanded,
    /// otherwise expands all. Returns the state that was applied.
    pub fn toggle_all<'a, I>(&mut self, present: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: Vec<&str> = present.into_iter().collect();
        let all_explicitly_expanded = !present.is_empty()
            && present
                .iter()
                .all(|key| self.flags.get(*key) == Some(&true));
        let target = !all_explicitly_expanded;
        for key in present {
            self.flags.insert(key.to_string(), target);
        }
        target
    }

    pub fn reset(&mut self) {
        self.flags.clear();
    }
}
