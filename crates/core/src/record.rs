use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An "action executed" event as raised by the host application.
///
/// This is the inbound shape of the append pipeline: parameters are still
/// raw and unsanitized, and no record id has been allocated yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEvent {
    /// The user that executed the action.
    pub username: String,
    /// The operation identifier.
    pub action_name: String,
    /// The resource path/route the action executed against.
    pub namespace: String,
    /// Raw action input parameters. A `BTreeMap` keeps serialization
    /// deterministic without an explicit sort.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// When the action completed.
    pub timestamp: DateTime<Utc>,
}

impl ActionEvent {
    /// Create an event with empty parameters, stamped with the current time.
    pub fn new(
        username: impl Into<String>,
        action_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            action_name: action_name.into(),
            namespace: namespace.into(),
            parameters: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Set the raw action parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Add a single raw parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Override the completion timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A record ready for insertion, before the store has assigned an id.
///
/// `parameters` is already the sanitized serialization produced by
/// [`ParamSanitizer`](crate::sanitize::ParamSanitizer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    /// The user that executed the action.
    pub username: String,
    /// The operation identifier.
    pub action_name: String,
    /// The resource path/route the action executed against.
    pub namespace: String,
    /// When the action completed.
    pub timestamp: DateTime<Utc>,
    /// Sanitized `key=value` parameter serialization, one entry per line.
    pub parameters: String,
}

/// A single persisted audit record. Immutable once created: it is only
/// ever read or deleted, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Store-allocated identifier, strictly increasing across the process
    /// lifetime and never reused, even after deletion.
    pub id: i64,
    /// The user that executed the action.
    pub username: String,
    /// The operation identifier.
    pub action_name: String,
    /// The resource path/route the action executed against.
    pub namespace: String,
    /// When the action completed.
    pub timestamp: DateTime<Utc>,
    /// Sanitized `key=value` parameter serialization, one entry per line.
    pub parameters: String,
}

impl AuditRecord {
    /// Attach a store-allocated id to a pending record.
    pub fn from_new(id: i64, record: NewRecord) -> Self {
        Self {
            id,
            username: record.username,
            action_name: record.action_name,
            namespace: record.namespace,
            timestamp: record.timestamp,
            parameters: record.parameters,
        }
    }
}
