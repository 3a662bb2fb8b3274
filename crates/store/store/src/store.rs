use async_trait::async_trait;

use actrail_core::record::{AuditRecord, NewRecord};

use crate::error::StoreError;

/// Trait for audit record storage backends.
///
/// Implementations must be `Send + Sync` to be shared across async tasks,
/// and must allocate ids atomically: even with a single-writer append
/// pipeline, id allocation may not assume one caller.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a record, allocating the next id.
    ///
    /// Ids are strictly increasing across the process lifetime and never
    /// reused, even after deletion.
    async fn insert(&self, record: NewRecord) -> Result<i64, StoreError>;

    /// Retrieve a record by id. An absent id is `Ok(None)`, not an error.
    async fn get(&self, id: i64) -> Result<Option<AuditRecord>, StoreError>;

    /// Delete a record by id.
    ///
    /// Returns `true` if a record was removed, `false` if the id was
    /// absent. Deleting an absent id is reported, not silently ignored.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// All records as a snapshot at call time, sorted by id ascending.
    ///
    /// Later inserts or deletes are not reflected in an already-returned
    /// vector.
    async fn all(&self) -> Result<Vec<AuditRecord>, StoreError>;
}
