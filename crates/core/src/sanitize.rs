//! Parameter sanitization for audit records.
//!
//! Action parameters are persisted as a single `key=value`-per-line string.
//! Keys on the sensitive list are dropped entirely: neither the key nor its
//! value appears in the output. The list of sensitive keys is policy owned
//! by the embedding application; the sanitizer only enforces it.

use std::collections::{BTreeMap, HashSet};

/// Serializes parameter maps while excluding sensitive keys.
///
/// Key matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct ParamSanitizer {
    /// Lowercased keys to exclude.
    sensitive: HashSet<String>,
}

impl ParamSanitizer {
    /// Create a sanitizer with exactly the given sensitive keys.
    ///
    /// The caller owns the policy; nothing is added implicitly. Most
    /// embedders should start from [`ParamSanitizer::default`], which
    /// already excludes `password`.
    pub fn new<I, S>(sensitive_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sensitive: sensitive_keys
                .into_iter()
                .map(|key| key.into().to_lowercase())
                .collect(),
        }
    }

    /// Add another sensitive key to the exclusion set.
    #[must_use]
    pub fn with_sensitive_key(mut self, key: impl Into<String>) -> Self {
        self.sensitive.insert(key.into().to_lowercase());
        self
    }

    /// Whether `key` is on the sensitive list.
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive.contains(&key.to_lowercase())
    }

    /// Serialize `parameters` to one `key=value` entry per line, in key
    /// order, omitting sensitive keys. An empty or fully-sensitive map
    /// serializes to the empty string.
    pub fn serialize(&self, parameters: &BTreeMap<String, String>) -> String {
        let mut out = String::new();
        for (key, value) in parameters {
            if self.is_sensitive(key) {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl Default for ParamSanitizer {
    /// A sanitizer that excludes only `password`.
    fn default() -> Self {
        Self::new(["password"])
    }
}
