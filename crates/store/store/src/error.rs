/// Errors that can occur during record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Storage(String),
}
