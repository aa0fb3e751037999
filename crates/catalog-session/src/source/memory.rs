//! In-memory record source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use catalog_model::{FieldValue, Record, RecordId};
use tokio::sync::RwLock;

use super::RecordSource;
use crate::error::{Result, SourceError};

/// Records held in memory, with switches to simulate an unreachable store.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: RwLock<Vec<Record>>,
    fail_fetch: AtomicBool,
    fail_updates: AtomicBool,
    updates: AtomicUsize,
}

impl MemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// Make every subsequent fetch fail.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::Relaxed);
    }

    /// Make every subsequent update fail.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::Relaxed);
    }

    /// Number of update calls received, successful or not.
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }

    pub async fn get(&self, id: &RecordId) -> Option<Record> {
        self.records.read().await.iter().find(|r| &r.id == id).cloned()
    }
}

impl RecordSource for MemorySource {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        if self.fail_fetch.load(Ordering::Relaxed) {
            return Err(SourceError::Unavailable("fetch disabled".to_string()));
        }
        let mut records = self.records.read().await.clone();
        records.sort_by(Record::recency_order);
        Ok(records)
    }

    async fn update_field(&self, id: &RecordId, field: &str, value: FieldValue) -> Result<()> {
        self.updates.fetch_add(1, Ordering::Relaxed);
        if self.fail_updates.load(Ordering::Relaxed) {
            return Err(SourceError::Unavailable("updates disabled".to_string()));
        }
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| SourceError::RecordNotFound(id.clone()))?;
        record.set(field, value);
        Ok(())
    }
}
