//! Asynchronous append pipeline.
//!
//! A single background worker drains an unbounded queue of action events,
//! sanitizes their parameters, and inserts them into the record store.
//! Submission never blocks the producer, and a storage failure is logged
//! and dropped rather than propagated: audit logging must never fail the
//! operation that triggered it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use actrail_core::record::{ActionEvent, NewRecord};
use actrail_core::sanitize::ParamSanitizer;
use actrail_store::store::RecordStore;

/// Queue plus single background worker writing audit records.
///
/// The queue is unbounded: expected volume is one event per user action,
/// so backpressure is not worth the blocking it would introduce. With one
/// worker, records are inserted in submission order and ids are monotonic
/// in that order.
pub struct AppendPipeline {
    tx: mpsc::UnboundedSender<ActionEvent>,
    /// Events submitted but not yet written (queued or in flight).
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
    worker: JoinHandle<()>,
}

impl AppendPipeline {
    /// Spawn the background worker. Must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn RecordStore>, sanitizer: ParamSanitizer) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let idle = Arc::new(Notify::new());

        let worker = tokio::spawn(run_worker(
            rx,
            store,
            sanitizer,
            Arc::clone(&pending),
            Arc::clone(&idle),
        ));

        Self {
            tx,
            pending,
            idle,
            worker,
        }
    }

    /// Enqueue an event for the background worker. Returns immediately.
    ///
    /// If the worker has stopped the event is dropped with a warning;
    /// there is no failure path back to the caller.
    pub fn submit(&self, event: ActionEvent) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        if self.tx.send(event).is_err() {
            warn!("append worker stopped; audit event dropped");
            self.settle_one();
        }
    }

    /// Wait until the queue is empty and no event is in flight.
    ///
    /// This does not stop other tasks from submitting concurrently; a
    /// caller needing a strict snapshot must serialize submissions itself.
    pub async fn drain(&self) {
        loop {
            let notified = self.idle.notified();
            if self.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Drain outstanding events, close the queue, and wait for the worker
    /// to exit.
    pub async fn shutdown(self) {
        self.drain().await;
        drop(self.tx);
        if let Err(error) = self.worker.await {
            warn!(%error, "append worker did not shut down cleanly");
        }
    }

    /// Mark one submitted event as settled and wake drainers at zero.
    fn settle_one(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<ActionEvent>,
    store: Arc<dyn RecordStore>,
    sanitizer: ParamSanitizer,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
) {
    debug!("append worker started");

    while let Some(event) = rx.recv().await {
        let parameters = sanitizer.serialize(&event.parameters);
        let record = NewRecord {
            username: event.username,
            action_name: event.action_name,
            namespace: event.namespace,
            timestamp: event.timestamp,
            parameters,
        };

        match store.insert(record).await {
            Ok(id) => debug!(id, "audit record written"),
            Err(error) => {
                // Best-effort channel: log and drop, keep the worker alive.
                warn!(%error, "failed to write audit record; event dropped");
            }
        }

        if pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            idle.notify_waiters();
        }
    }

    debug!("append worker stopped");
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use actrail_core::record::{ActionEvent, AuditRecord, NewRecord};
    use actrail_core::sanitize::ParamSanitizer;
    use actrail_store::error::StoreError;
    use actrail_store::store::RecordStore;
    use actrail_store_memory::MemoryRecordStore;

    use super::AppendPipeline;

    fn event(username: &str) -> ActionEvent {
        ActionEvent::new(username, "ping", "/do/Test")
    }

    /// A store whose inserts fail while the flag is set. Reads delegate to
    /// the inner store so tests can observe what was actually written.
    struct FlakyRecordStore {
        inner: MemoryRecordStore,
        failing: AtomicBool,
    }

    impl FlakyRecordStore {
        fn new(failing: bool) -> Self {
            Self {
                inner: MemoryRecordStore::new(),
                failing: AtomicBool::new(failing),
            }
        }
    }

    #[async_trait]
    impl RecordStore for FlakyRecordStore {
        async fn insert(&self, record: NewRecord) -> Result<i64, StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Storage("store unavailable".to_owned()));
            }
            self.inner.insert(record).await
        }

        async fn get(&self, id: i64) -> Result<Option<AuditRecord>, StoreError> {
            self.inner.get(id).await
        }

        async fn delete(&self, id: i64) -> Result<bool, StoreError> {
            self.inner.delete(id).await
        }

        async fn all(&self) -> Result<Vec<AuditRecord>, StoreError> {
            self.inner.all().await
        }
    }

    #[tokio::test]
    async fn drain_on_idle_pipeline_returns_immediately() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let pipeline = AppendPipeline::new(store, ParamSanitizer::default());
        pipeline.drain().await;
    }

    #[tokio::test]
    async fn submitted_events_are_written_after_drain() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let pipeline = AppendPipeline::new(Arc::clone(&store), ParamSanitizer::default());

        for i in 0..5 {
            pipeline.submit(event(&format!("user{i}")));
        }
        pipeline.drain().await;

        let records = store.all().await.unwrap();
        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.username, format!("user{i}"));
        }
    }

    #[tokio::test]
    async fn ids_follow_submission_order() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let pipeline = AppendPipeline::new(Arc::clone(&store), ParamSanitizer::default());

        for i in 0..10 {
            pipeline.submit(event(&format!("user{i}")));
        }
        pipeline.drain().await;

        let records = store.all().await.unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted, "ids should be monotonic in submission order");
    }

    #[tokio::test]
    async fn worker_sanitizes_parameters() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let pipeline = AppendPipeline::new(Arc::clone(&store), ParamSanitizer::default());

        let mut params = BTreeMap::new();
        params.insert("password".to_owned(), "secret".to_owned());
        params.insert("page".to_owned(), "3".to_owned());
        pipeline.submit(event("admin").with_parameters(params));
        pipeline.drain().await;

        let records = store.all().await.unwrap();
        assert_eq!(records[0].parameters, "page=3");
    }

    #[tokio::test]
    async fn insert_failure_drops_the_event_and_keeps_the_worker_alive() {
        let store = Arc::new(FlakyRecordStore::new(true));
        let pipeline = AppendPipeline::new(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            ParamSanitizer::default(),
        );

        // The failed insert must still count as settled: drain returns
        // and nothing was written.
        pipeline.submit(event("admin"));
        pipeline.drain().await;
        assert!(store.inner.all().await.unwrap().is_empty());

        // The worker survives the failure and writes the next event once
        // the store recovers.
        store.failing.store(false, Ordering::SeqCst);
        pipeline.submit(event("admin"));
        pipeline.drain().await;

        let records = store.inner.all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "admin");
    }

    #[tokio::test]
    async fn drain_returns_after_a_run_of_failed_inserts() {
        let store = Arc::new(FlakyRecordStore::new(true));
        let pipeline = AppendPipeline::new(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            ParamSanitizer::default(),
        );

        for i in 0..10 {
            pipeline.submit(event(&format!("user{i}")));
        }
        pipeline.drain().await;

        assert!(store.inner.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shutdown_flushes_outstanding_events() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let pipeline = AppendPipeline::new(Arc::clone(&store), ParamSanitizer::default());

        pipeline.submit(event("admin"));
        pipeline.shutdown().await;

        assert_eq!(store.all().await.unwrap().len(), 1);
    }
}
