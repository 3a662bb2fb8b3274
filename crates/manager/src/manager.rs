//! The audit manager facade.
//!
//! This is the only seam external collaborators use: the web layer calls
//! [`AuditManager::record`], operator tooling calls `get`/`search`/
//! `delete`/`drain`. No other component is reachable from outside.

use std::sync::Arc;

use actrail_core::criteria::{DateRange, SearchCriteria};
use actrail_core::record::{ActionEvent, AuditRecord};
use actrail_core::sanitize::ParamSanitizer;
use actrail_store::store::RecordStore;

use crate::error::AuditError;
use crate::pipeline::AppendPipeline;
use crate::search;

/// Facade over the append pipeline, search engine, and record store.
pub struct AuditManager {
    store: Arc<dyn RecordStore>,
    pipeline: AppendPipeline,
}

impl AuditManager {
    /// Create a manager with the default sensitive-key policy (`password`).
    ///
    /// Spawns the append worker; must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            pipeline: AppendPipeline::new(Arc::clone(&store), ParamSanitizer::default()),
            store,
        }
    }

    /// Start building a manager.
    #[must_use]
    pub fn builder() -> AuditManagerBuilder {
        AuditManagerBuilder::new()
    }

    /// Submit an event for asynchronous recording. Fire-and-forget: never
    /// blocks, never fails the caller.
    pub fn record(&self, event: ActionEvent) {
        self.pipeline.submit(event);
    }

    /// Fetch a record by id. An absent id is `Ok(None)`.
    ///
    /// A read may not yet observe a submitted-but-queued event; call
    /// [`AuditManager::drain`] first for read-after-write consistency.
    pub async fn get(&self, id: i64) -> Result<Option<AuditRecord>, AuditError> {
        Ok(self.store.get(id).await?)
    }

    /// Return the ids of records matching `criteria`, in no guaranteed
    /// order.
    ///
    /// The criteria's date fields are validated before the store is read;
    /// a malformed date fails the whole search rather than degrading to a
    /// partial filter.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<i64>, AuditError> {
        let range = DateRange::from_criteria(criteria)?;
        let records = self.store.all().await?;
        Ok(search::matching_ids(criteria, &range, &records))
    }

    /// Delete a record by id. Irreversible. Returns `false` for an absent
    /// id.
    pub async fn delete(&self, id: i64) -> Result<bool, AuditError> {
        Ok(self.store.delete(id).await?)
    }

    /// Wait until all submitted events have been persisted (or dropped).
    pub async fn drain(&self) {
        self.pipeline.drain().await;
    }

    /// Drain and stop the append worker.
    pub async fn shutdown(self) {
        self.pipeline.shutdown().await;
    }
}

/// Builder for [`AuditManager`].
pub struct AuditManagerBuilder {
    store: Option<Arc<dyn RecordStore>>,
    sanitizer: ParamSanitizer,
}

impl AuditManagerBuilder {
    /// Create a builder with the default sensitive-key policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            sanitizer: ParamSanitizer::default(),
        }
    }

    /// Set the record store backend.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the sanitizer wholesale with a caller-supplied policy.
    #[must_use]
    pub fn sanitizer(mut self, sanitizer: ParamSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Add a key to the sensitive-key exclusion set.
    #[must_use]
    pub fn sensitive_key(mut self, key: impl Into<String>) -> Self {
        self.sanitizer = self.sanitizer.with_sensitive_key(key);
        self
    }

    /// Build the manager, spawning its append worker.
    pub fn build(self) -> Result<AuditManager, &'static str> {
        let store = self.store.ok_or("record store is required")?;
        Ok(AuditManager {
            pipeline: AppendPipeline::new(Arc::clone(&store), self.sanitizer),
            store,
        })
    }
}

impl Default for AuditManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
