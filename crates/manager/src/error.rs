use actrail_core::criteria::CriteriaError;
use actrail_store::error::StoreError;

/// Errors surfaced by the audit manager's synchronous operations.
///
/// Failures inside the async append worker never appear here: the append
/// path is best-effort and has no return channel to the event producer.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The underlying record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search criteria failed validation.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}
