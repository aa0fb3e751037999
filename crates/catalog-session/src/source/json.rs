//! JSON catalog files.
//!
//! A catalog file is a JSON array of records. Writes go to a temp file
//! which is then renamed over the original.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use catalog_model::{FieldValue, Record, RecordId};
use tracing::{debug, info};

use super::RecordSource;
use crate::error::{Result, SourceError};

/// Load every record of a catalog file, most recently created first.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = fs::read(path).map_err(|e| SourceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut records: Vec<Record> =
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;
    records.sort_by(Record::recency_order);
    debug!(path = %path.display(), records = records.len(), "catalog file read");
    Ok(records)
}

/// Write records to a catalog file atomically (temp file + rename).
pub fn save_records(path: &Path, records: &[Record]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records).map_err(|e| SourceError::Encode { source: e })?;

    let temp_path = path.with_extension("json.tmp");

    let mut file = File::create(&temp_path).map_err(|e| SourceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| SourceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| SourceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| SourceError::Io {
        operation: "replace",
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), records = records.len(), "catalog file written");
    Ok(())
}

/// A catalog stored as a JSON file on disk.
///
/// Blocking file I/O runs on Tokio's blocking pool. Updates are
/// read-modify-write, serialized by an internal lock.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn update_file(path: &Path, id: &RecordId, field: &str, value: FieldValue) -> Result<()> {
    let bytes = fs::read(path).map_err(|e| SourceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    // Keep the file's own order; only fetches sort.
    let mut records: Vec<Record> =
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;
    let record = records
        .iter_mut()
        .find(|r| &r.id == id)
        .ok_or_else(|| SourceError::RecordNotFound(id.clone()))?;
    record.set(field, value);
    save_records(path, &records)
}

impl RecordSource for JsonFileSource {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_records(&path))
            .await
            .map_err(|e| SourceError::Task { source: e })?
    }

    async fn update_field(&self, id: &RecordId, field: &str, value: FieldValue) -> Result<()> {
        let path = self.path.clone();
        let lock = Arc::clone(&self.write_lock);
        let id = id.clone();
        let field = field.to_string();
        tokio::task::spawn_blocking(move || {
            let _guard = lock
                .lock()
                .map_err(|_| SourceError::Unavailable("catalog write lock poisoned".to_string()))?;
            update_file(&path, &id, &field, value)
        })
        .await
        .map_err(|e| SourceError::Task { source: e })?
    }
}
