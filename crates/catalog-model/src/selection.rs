//! Active facet constraints.

use std::collections::BTreeMap;

use crate::record::Record;
use crate::value::FieldValue;

/// Facet name to selected value. A facet with no entry is unset and does
/// not constrain the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    selected: BTreeMap<String, FieldValue>,
}

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or unset a facet. Returns `true` when the selection changed.
    pub fn set(&mut self, facet: &str, value: Option<FieldValue>) -> bool {
        match value {
            Some(value) => self.selected.insert(facet.to_string(), value.clone()) != Some(value),
            None => self.selected.remove(facet).is_some(),
        }
    }

    pub fn get(&self, facet: &str) -> Option<&FieldValue> {
        self.selected.get(facet)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.selected.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every active facet equals the record's value for that field.
    pub fn matches(&self, record: &Record) -> bool {
        self.selected
            .iter()
            .all(|(facet, wanted)| record.get(facet) == Some(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    #[test]
    fn set_reports_changes() {
        let mut selection = FacetSelection::new();
        assert!(selection.set("year", Some(FieldValue::Integer(2023))));
        assert!(!selection.set("year", Some(FieldValue::Integer(2023))));
        assert!(selection.set("year", Some(FieldValue::Integer(2022))));
        assert!(selection.set("year", None));
        assert!(!selection.set("year", None));
    }

    #[test]
    fn missing_field_fails_an_active_facet() {
        let record = Record::new(RecordId::new("r").unwrap()).with_field("year", 2023);
        let mut selection = FacetSelection::new();
        selection.set("region", Some(FieldValue::text("North")));
        assert!(!selection.matches(&record));
    }
}
