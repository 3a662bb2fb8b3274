//! Criteria evaluation over the record set.
//!
//! Matching is a pure conjunction: every specified predicate must hold.
//! Date validation happens before this module runs (see
//! [`DateRange::from_criteria`]), so matching itself cannot fail.

use actrail_core::criteria::{DateRange, SearchCriteria};
use actrail_core::record::AuditRecord;

/// Return the ids of records matching `criteria`, in no guaranteed order.
///
/// `range` must be the validated form of the criteria's date fields.
pub fn matching_ids(
    criteria: &SearchCriteria,
    range: &DateRange,
    records: &[AuditRecord],
) -> Vec<i64> {
    records
        .iter()
        .filter(|record| matches(criteria, range, record))
        .map(|record| record.id)
        .collect()
}

fn matches(criteria: &SearchCriteria, range: &DateRange, record: &AuditRecord) -> bool {
    fragment_matches(criteria.username.as_deref(), &record.username)
        && fragment_matches(criteria.action_name.as_deref(), &record.action_name)
        && fragment_matches(criteria.namespace.as_deref(), &record.namespace)
        && fragment_matches(criteria.params.as_deref(), &record.parameters)
        && range.contains(record.timestamp)
}

/// Case-folded substring containment. An absent or empty fragment leaves
/// the field unconstrained.
fn fragment_matches(fragment: Option<&str>, value: &str) -> bool {
    fragment.is_none_or(|f| f.is_empty() || value.to_lowercase().contains(&f.to_lowercase()))
}
