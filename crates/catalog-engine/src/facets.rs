//! Facet index: the values offered by each filter picker.
//!
//! Values come from the whole collection, not from the filtered results, so
//! narrowing by one facet never hides the options of another.

use std::collections::BTreeSet;

use catalog_model::{FacetOrder, FieldValue, ListingSchema, Record};
use serde::Serialize;

/// Sorted distinct values of one field across `records`.
pub fn distinct_values(records: &[Record], field: &str, order: FacetOrder) -> Vec<FieldValue> {
    let unique: BTreeSet<&FieldValue> = records.iter().filter_map(|r| r.get(field)).collect();
    let values = unique.into_iter().cloned();
    match order {
        FacetOrder::Ascending => values.collect(),
        FacetOrder::Descending => values.rev().collect(),
    }
}

/// Picker contents for one facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetValues {
    pub field: String,
    pub values: Vec<FieldValue>,
}

/// Picker contents for every facet of a listing, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetIndex {
    facets: Vec<FacetValues>,
}

impl FacetIndex {
    pub fn build(records: &[Record], schema: &ListingSchema) -> Self {
        let facets = schema
            .facets
            .iter()
            .map(|spec| FacetValues {
                field: spec.field.clone(),
                values: distinct_values(records, &spec.field, spec.order),
            })
            .collect();
        Self { facets }
    }

    pub fn facets(&self) -> &[FacetValues] {
        &self.facets
    }

    pub fn values(&self, field: &str) -> Option<&[FieldValue]> {
        self.facets
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.values.as_slice())
    }
}
