//! Error types for browsing operations.

use catalog_model::{ModelError, RecordId};
use thiserror::Error;

/// Errors from engine operations.
///
/// None of these leave the engine in an inconsistent state: an operation
/// that fails has not changed anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The listing schema declares no such facet.
    #[error("unknown facet: {0}")]
    UnknownFacet(String),
    /// No record with this id is in the collection.
    #[error("record not found: {0}")]
    UnknownRecord(RecordId),
    /// The field holds a non-integer value and cannot be incremented.
    #[error("field '{field}' of record {id} is not a counter")]
    NotACounter { id: RecordId, field: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
