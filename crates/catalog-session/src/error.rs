//! Record source error types.
//!
//! Source failures never reach the filtering logic: a failed fetch becomes
//! an empty collection and a failed write leaves the optimistic local update
//! in place. These errors exist for logging and for callers that want to
//! tell the user what happened.

use std::path::PathBuf;

use catalog_model::RecordId;
use thiserror::Error;

/// Record source operation error.
#[derive(Debug, Error)]
pub enum SourceError {
    /// File I/O error.
    #[error("Failed to {operation} catalog file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file does not hold a JSON array of records.
    #[error("Invalid catalog file: {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be encoded for writing.
    #[error("Failed to encode catalog records")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The source has no record with this id.
    #[error("Record not found in source: {0}")]
    RecordNotFound(RecordId),

    /// The source refused or could not be reached.
    #[error("Record source unavailable: {0}")]
    Unavailable(String),

    /// A blocking task was cancelled or panicked.
    #[error("Background task failed")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl SourceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the catalog at {}", operation, path.display()),
            Self::Decode { path, .. } => format!(
                "The file at {} is not a valid catalog (expected a JSON array of records).",
                path.display()
            ),
            Self::Encode { .. } => "An error occurred while writing the catalog.".to_string(),
            Self::RecordNotFound(id) => format!("The record '{id}' no longer exists."),
            Self::Unavailable(_) => "The catalog is currently unavailable.".to_string(),
            Self::Task { .. } => "The operation was interrupted.".to_string(),
        }
    }
}

/// Result type alias for record source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
