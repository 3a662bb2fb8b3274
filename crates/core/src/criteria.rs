//! Search criteria and the validated date range derived from them.
//!
//! Criteria arrive from operator tooling with dates as raw `dd/mm/yyyy`
//! strings. Parsing is a dedicated step ([`DateRange::from_criteria`]) so
//! that validation failures surface before any matching happens.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Day-granularity date format accepted in criteria.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Filter applied to the record set during search. Every field is
/// optional; an absent field places no constraint on the record.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Case-insensitive substring match against the record username.
    pub username: Option<String>,
    /// Case-insensitive substring match against the action name.
    pub action_name: Option<String>,
    /// Case-insensitive substring match against the namespace.
    pub namespace: Option<String>,
    /// Case-insensitive substring match against the serialized parameters.
    pub params: Option<String>,
    /// Inclusive lower bound, `dd/mm/yyyy`. Records on or after the start
    /// of this calendar day match.
    pub start_date: Option<String>,
    /// Inclusive upper bound, `dd/mm/yyyy`. Records on or before the end
    /// of this calendar day match.
    pub end_date: Option<String>,
}

impl SearchCriteria {
    /// Constrain the username field.
    #[must_use]
    pub fn with_username(mut self, fragment: impl Into<String>) -> Self {
        self.username = Some(fragment.into());
        self
    }

    /// Constrain the action name field.
    #[must_use]
    pub fn with_action_name(mut self, fragment: impl Into<String>) -> Self {
        self.action_name = Some(fragment.into());
        self
    }

    /// Constrain the namespace field.
    #[must_use]
    pub fn with_namespace(mut self, fragment: impl Into<String>) -> Self {
        self.namespace = Some(fragment.into());
        self
    }

    /// Constrain the serialized parameters field.
    #[must_use]
    pub fn with_params(mut self, fragment: impl Into<String>) -> Self {
        self.params = Some(fragment.into());
        self
    }

    /// Set the inclusive start day (`dd/mm/yyyy`).
    #[must_use]
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Set the inclusive end day (`dd/mm/yyyy`).
    #[must_use]
    pub fn with_end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }
}

/// Errors produced while validating search criteria.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    /// A date string in the criteria could not be parsed as `dd/mm/yyyy`.
    #[error("invalid {field} date {value:?}: expected dd/mm/yyyy")]
    InvalidDate {
        /// Which criteria field held the bad value.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },
}

/// Validated timestamp bounds derived from criteria date strings.
///
/// Both bounds are inclusive: the start bound is 00:00:00.000 of the start
/// day and the end bound is 23:59:59.999 of the end day, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse the date fields of `criteria` into a validated range.
    ///
    /// A malformed date fails the whole search rather than being silently
    /// treated as unconstrained.
    pub fn from_criteria(criteria: &SearchCriteria) -> Result<Self, CriteriaError> {
        let start = criteria
            .start_date
            .as_deref()
            .map(|value| parse_day("start", value))
            .transpose()?
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());

        let end = criteria
            .end_date
            .as_deref()
            .map(|value| parse_day("end", value))
            .transpose()?
            .map(|day| day.and_time(NaiveTime::MIN).and_utc() + Duration::milliseconds(86_399_999));

        Ok(Self { start, end })
    }

    /// Whether `timestamp` falls within the range (bounds inclusive).
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if timestamp > end {
                return false;
            }
        }
        true
    }
}

fn parse_day(field: &'static str, value: &str) -> Result<NaiveDate, CriteriaError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| CriteriaError::InvalidDate {
        field,
        value: value.to_owned(),
    })
}
