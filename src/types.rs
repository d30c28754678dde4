//! Core types for paged-fetch

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::StoreError;

/// Equality value a filter compares a field against
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Matches fields that are NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer value
    Integer(i64),
    /// Floating-point value
    Real(f64),
    /// Text value
    Text(String),
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Integer(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Integer(i64::from(v))
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Real(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FilterValue::Null, Into::into)
    }
}

/// Set of field-equality filters; an empty set matches every record
///
/// Keys are unique and kept sorted, so stores that translate the set into a
/// query produce the same statement for the same filters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, FilterValue>);

impl FilterSet {
    /// Create an empty filter set (matches all records)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a repeated field replaces the earlier value
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace the value for `field`
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Look up the value for `field`
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.0.get(field)
    }

    /// Whether the set matches all records
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of filtered fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate fields in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One page of the overall result set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageDescriptor {
    /// Zero-based page index
    pub index: u64,
    /// Maximum number of records on this page
    pub size: usize,
    /// Number of records to skip, `index * size`
    pub offset: u64,
}

impl fmt::Display for PageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} (offset {}, size {})",
            self.index, self.offset, self.size
        )
    }
}

/// What a single page task reports back to the coordinator
#[derive(Debug)]
pub struct PageOutcome<R> {
    /// Index of the page this outcome belongs to
    pub index: u64,
    /// Records on success, the store's error on failure
    pub result: std::result::Result<Vec<R>, StoreError>,
}

impl<R> PageOutcome<R> {
    /// Successful outcome
    pub fn success(index: u64, records: Vec<R>) -> Self {
        Self {
            index,
            result: Ok(records),
        }
    }

    /// Failed outcome
    pub fn failure(index: u64, cause: StoreError) -> Self {
        Self {
            index,
            result: Err(cause),
        }
    }

    /// Whether the page was fetched
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Statistics for a completed fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchSummary {
    /// Number of matching records reported by the counting query
    pub total_records: u64,
    /// Number of pages fetched
    pub page_count: u64,
    /// Number of records actually returned
    pub records_fetched: usize,
    /// Wall-clock time from count to merge
    pub elapsed: Duration,
}

/// Progress events emitted by [`PagedFetcher`](crate::PagedFetcher)
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The counting query finished and pages were planned
    CountCompleted {
        /// Matching records
        total_records: u64,
        /// Pages that will be fetched
        page_count: u64,
    },

    /// A page was fetched
    PageFetched {
        /// Page index
        page_index: u64,
        /// Records on this page
        records: usize,
    },

    /// A page fetch failed
    PageFailed {
        /// Page index
        page_index: u64,
        /// Store error message
        error: String,
    },

    /// The whole fetch succeeded
    Completed(FetchSummary),

    /// The whole fetch failed
    Failed {
        /// Error message of the surfaced error
        error: String,
    },
}
