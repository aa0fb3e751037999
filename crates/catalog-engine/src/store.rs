//! The collection store: the current full set of records of one listing.

use std::collections::HashMap;

use catalog_model::{FieldValue, Record, RecordId, check_field_name};
use tracing::warn;

use crate::error::{CatalogError, Result};

/// Holds the records of one listing in source order.
///
/// The store is replaced wholesale by a fetch; afterwards only single-field
/// updates are applied, each addressing a record by id.
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    records: Vec<Record>,
    positions: HashMap<RecordId, usize>,
    /// Bumped on every change, so derived data can tell it is stale.
    revision: u64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut store = Self::new();
        store.replace(records);
        store
    }

    /// Replace every record. Later duplicates of an id are dropped.
    pub fn replace(&mut self, records: Vec<Record>) {
        self.records.clear();
        self.positions.clear();
        for record in records {
            if self.positions.contains_key(&record.id) {
                warn!(id = %record.id, "dropping duplicate record id");
                continue;
            }
            self.positions.insert(record.id.clone(), self.records.len());
            self.records.push(record);
        }
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    fn get_mut(&mut self, id: &RecordId) -> Result<&mut Record> {
        match self.positions.get(id) {
            Some(&pos) => Ok(&mut self.records[pos]),
            None => Err(CatalogError::UnknownRecord(id.clone())),
        }
    }

    /// Overwrite one field of one record. `id` and `created_at` are not
    /// fields and cannot be written.
    pub fn set_field(&mut self, id: &RecordId, field: &str, value: FieldValue) -> Result<()> {
        check_field_name(field)?;
        let record = self.get_mut(id)?;
        record.set(field, value);
        self.revision += 1;
        Ok(())
    }

    /// Add one to an integer field and return the new value.
    ///
    /// A missing field counts as zero.
    pub fn increment(&mut self, id: &RecordId, field: &str) -> Result<i64> {
        check_field_name(field)?;
        let record = self.get_mut(id)?;
        let current = match record.get(field) {
            None => 0,
            Some(FieldValue::Integer(value)) => *value,
            Some(_) => {
                return Err(CatalogError::NotACounter {
                    id: id.clone(),
                    field: field.to_string(),
                });
            }
        };
        let next = current.saturating_add(1);
        record.set(field, FieldValue::Integer(next));
        self.revision += 1;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use catalog_model::ModelError;

    use super::*;

    fn record(id: &str) -> Record {
        Record::new(RecordId::new(id).unwrap())
    }

    #[test]
    fn replace_keeps_order_and_drops_duplicates() {
        let store = CollectionStore::from_records(vec![
            record("b").with_field("n", 1),
            record("a"),
            record("b").with_field("n", 2),
        ]);
        let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        let b = store.get(&RecordId::new("b").unwrap()).unwrap();
        assert_eq!(b.get("n"), Some(&FieldValue::Integer(1)));
    }

    #[test]
    fn increment_starts_missing_counters_at_zero() {
        let mut store = CollectionStore::from_records(vec![record("a")]);
        let id = RecordId::new("a").unwrap();
        assert_eq!(store.increment(&id, "views").unwrap(), 1);
        assert_eq!(store.increment(&id, "views").unwrap(), 2);
    }

    #[test]
    fn increment_rejects_text_and_unknown_ids() {
        let mut store =
            CollectionStore::from_records(vec![record("a").with_field("views", "many")]);
        let before = store.revision();
        let id = RecordId::new("a").unwrap();
        assert!(matches!(
            store.increment(&id, "views"),
            Err(CatalogError::NotACounter { .. })
        ));
        let missing = RecordId::new("zzz").unwrap();
        assert_eq!(
            store.increment(&missing, "views"),
            Err(CatalogError::UnknownRecord(missing.clone()))
        );
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn reserved_names_cannot_be_written() {
        let mut store = CollectionStore::from_records(vec![record("a")]);
        let before = store.revision();
        let id = RecordId::new("a").unwrap();
        assert_eq!(
            store.set_field(&id, "id", FieldValue::text("b")),
            Err(CatalogError::Model(ModelError::InvalidFieldName("id".to_string())))
        );
        assert!(store.set_field(&id, "created_at", FieldValue::Integer(0)).is_err());
        assert!(store.increment(&id, "id").is_err());
        assert_eq!(store.revision(), before);
        assert!(store.get(&id).unwrap().fields.is_empty());
    }

    #[test]
    fn float_and_flag_fields_are_not_counters() {
        let rated = record("a")
            .with_field("rating", 4.5)
            .with_field("verified", true);
        let mut store = CollectionStore::from_records(vec![rated]);
        let id = RecordId::new("a").unwrap();
        assert!(matches!(
            store.increment(&id, "rating"),
            Err(CatalogError::NotACounter { .. })
        ));
        assert!(matches!(
            store.increment(&id, "verified"),
            Err(CatalogError::NotACounter { .. })
        ));
    }
}
