//! Record sources: where a listing's records come from.
//!
//! This module provides:
//! - The [`RecordSource`] trait (fetch everything, update one field)
//! - An in-memory source for demos and tests
//! - A JSON-file source with atomic writes

mod json;
mod memory;

use std::future::Future;

use catalog_model::{FieldValue, Record, RecordId};

use crate::error::Result;

pub use json::{JsonFileSource, load_records, save_records};
pub use memory::MemorySource;

/// Remote record store contract.
///
/// Both operations may fail; callers decide how to degrade.
pub trait RecordSource: Send + Sync + 'static {
    /// Full current snapshot, most recently created first.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Overwrite one field of one record.
    fn update_field(
        &self,
        id: &RecordId,
        field: &str,
        value: FieldValue,
    ) -> impl Future<Output = Result<()>> + Send;
}
