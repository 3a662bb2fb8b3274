use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use actrail_core::record::{AuditRecord, NewRecord};
use actrail_store::error::StoreError;
use actrail_store::store::RecordStore;

/// In-memory record store using `DashMap`.
///
/// Ids come from an atomic counter starting at 1, so allocation stays
/// correct even if multiple writers insert concurrently.
pub struct MemoryRecordStore {
    records: DashMap<i64, AuditRecord>,
    next_id: AtomicI64,
}

impl MemoryRecordStore {
    /// Create a new empty in-memory record store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: NewRecord) -> Result<i64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.insert(id, AuditRecord::from_new(id, record));
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<AuditRecord>, StoreError> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn all(&self) -> Result<Vec<AuditRecord>, StoreError> {
        let mut records: Vec<AuditRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
