//! Error types for paged-fetch
//!
//! This module provides the error handling for the library:
//! - [`Error`] - the crate-level error surfaced to callers of the fetch engine
//! - [`StoreError`] - failures reported by a [`RecordStore`](crate::store::RecordStore)
//! - [`DatabaseError`] - lifecycle failures of the bundled SQLite store
//!
//! Page-level failures carry the index of the page that failed so a caller can
//! tell which slice of the result set could not be read.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for paged-fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for record store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Main error type for paged-fetch
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a configuration the engine cannot run with
    /// (zero page size, zero concurrency limit, offset overflow)
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Human-readable description of the problem
        message: String,
        /// The configuration key that caused the error (e.g., "page_size")
        key: Option<String>,
    },

    /// The counting query failed; no page was fetched
    #[error("failed to count matching records: {0}")]
    CountFailed(#[source] StoreError),

    /// At least one page fetch failed
    ///
    /// `page_index` is the lowest failing page; `failed_pages` is the number of
    /// pages that failed in the same invocation.
    #[error("failed to fetch page {page_index} ({failed_pages} page(s) failed): {source}")]
    PageFetchFailed {
        /// Index of the representative failing page
        page_index: u64,
        /// Total number of pages that failed
        failed_pages: usize,
        /// The store error reported for `page_index`
        #[source]
        source: StoreError,
    },

    /// A page task panicked or was aborted before reporting an outcome
    #[error("fetch task for page {page_index} did not complete")]
    TaskPanicked {
        /// Index of the page whose task was lost
        page_index: u64,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an [`Error::InvalidConfiguration`] for a specific key
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidConfiguration { .. } => "invalid_configuration",
            Error::CountFailed(_) => "count_failed",
            Error::PageFetchFailed { .. } => "page_fetch_failed",
            Error::TaskPanicked { .. } => "task_panicked",
            Error::Database(_) => "database_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }

    /// Index of the failing page, for page-level failures
    pub fn page_index(&self) -> Option<u64> {
        match self {
            Error::PageFetchFailed { page_index, .. } | Error::TaskPanicked { page_index } => {
                Some(*page_index)
            }
            _ => None,
        }
    }
}

/// Errors reported by a record store
///
/// Timeout policy belongs to the store; the engine only propagates it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store could not be reached or the connection was lost
    #[error("connection error: {0}")]
    Connection(String),

    /// The query was rejected or failed to execute
    #[error("query error: {0}")]
    Query(String),

    /// The store gave up waiting
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Any other store-specific failure
    #[error("{0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::Connection("timed out waiting for a pooled connection".to_string())
            }
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::Connection(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}
