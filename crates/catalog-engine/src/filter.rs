//! Filter predicate: committed search text AND every active facet.

use catalog_model::{FacetSelection, ListingSchema, Record};

/// Indices into the collection store of the records that pass the filter,
/// in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredSet {
    indices: Vec<usize>,
}

impl FilteredSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Resolve the filtered records against the store they were computed from.
    pub fn records<'a>(&'a self, records: &'a [Record]) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Normalised search text: trimmed and lower-cased. Empty matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(committed: &str) -> Self {
        Self {
            needle: committed.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Case-insensitive substring match against any of `fields`.
    pub fn matches(&self, record: &Record, fields: &[String]) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        fields
            .iter()
            .filter_map(|field| record.get(field))
            .any(|value| value.search_text().contains(&self.needle))
    }
}

/// Run the full predicate over every record.
pub fn compute(
    records: &[Record],
    schema: &ListingSchema,
    committed: &str,
    selection: &FacetSelection,
) -> FilteredSet {
    let query = SearchQuery::new(committed);
    let indices = records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            query.matches(record, &schema.search_fields) && selection.matches(record)
        })
        .map(|(i, _)| i)
        .collect();
    FilteredSet { indices }
}
