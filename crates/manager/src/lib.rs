//! Audit trail subsystem: asynchronous record append pipeline, criteria
//! search engine, and the [`AuditManager`] facade external collaborators
//! integrate against.
//!
//! Data flow: `ActionEvent` -> [`AppendPipeline`] -> sanitizer -> record
//! store (write); `SearchCriteria` -> [`AuditManager::search`] -> search
//! engine -> record store (read).

pub mod error;
pub mod manager;
pub mod pipeline;
pub mod search;

pub use error::AuditError;
pub use manager::{AuditManager, AuditManagerBuilder};
pub use pipeline::AppendPipeline;
