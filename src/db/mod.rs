//! SQLite record store for paged-fetch
//!
//! A concrete [`RecordStore`](crate::store::RecordStore) backed by a single
//! `records` table, usable as the store behind [`PagedFetcher`](crate::PagedFetcher).
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] - Database lifecycle, schema migrations
//! - [`records`] - Record inserts, filtered counting and paging, the `RecordStore` impl

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, sqlite::SqlitePool};

mod migrations;
mod records;

/// Columns that may appear as keys in a [`FilterSet`](crate::FilterSet)
/// passed to the SQLite store
pub const FILTERABLE_COLUMNS: &[&str] = &["id", "collection", "name", "status", "created_at"];

/// New record to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Logical grouping the record belongs to
    pub collection: String,
    /// Display name
    pub name: String,
    /// Optional status label
    pub status: Option<String>,
    /// Arbitrary JSON payload
    pub payload: serde_json::Value,
}

/// Record row from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Unique database ID
    pub id: i64,
    /// Logical grouping the record belongs to
    pub collection: String,
    /// Display name
    pub name: String,
    /// Optional status label
    pub status: Option<String>,
    /// JSON payload as stored
    pub payload: String,
    /// Unix timestamp when the record was inserted
    pub created_at: i64,
}

impl StoredRecord {
    /// Parse the stored payload
    pub fn payload_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Database handle for paged-fetch
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
