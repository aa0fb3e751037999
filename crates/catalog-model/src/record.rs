//! Catalog records.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordId;
use crate::value::FieldValue;

/// Keys owned by the record itself rather than its field map.
pub const RESERVED_FIELDS: [&str; 2] = ["id", "created_at"];

/// Reject names that cannot hold a field value: blank, or one of
/// [`RESERVED_FIELDS`].
pub fn check_field_name(field: &str) -> Result<()> {
    if field.trim().is_empty() || RESERVED_FIELDS.contains(&field) {
        return Err(ModelError::InvalidFieldName(field.to_string()));
    }
    Ok(())
}

/// One entry of a listing (an exam paper, a hospital, a worker profile...).
///
/// In JSON the fields sit next to `id` and `created_at`:
///
/// ```json
/// { "id": "p-1", "created_at": "2024-03-01T10:00:00Z", "title": "Calculus I", "year": 2023 }
/// ```
///
/// A field set to `null` is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten, deserialize_with = "fields_without_nulls")]
    pub fields: BTreeMap<String, FieldValue>,
}

fn fields_without_nulls<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = BTreeMap::<String, Option<FieldValue>>::deserialize(deserializer)?;
    Ok(fields
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect())
}

impl Record {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            created_at: None,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Server order: most recently created first, undated records last,
    /// ties broken by id so the order is total.
    pub fn recency_order(a: &Record, b: &Record) -> Ordering {
        match (&a.created_at, &b.created_at) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.id.cmp(&b.id))
    }
}
