//! # paged-fetch
//!
//! Concurrent paginated retrieval of every record matching a filter set.
//!
//! ## Design Philosophy
//!
//! paged-fetch is designed to be:
//! - **All-or-nothing** - A fetch returns every matching record in page order, or one error
//! - **Never cancelling** - A failing page does not abort its siblings; every page task is awaited
//! - **Bounded** - Store calls are gated by a shared concurrency limit
//! - **Event-driven** - Consumers subscribe to progress events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use paged_fetch::{Database, FetchConfig, FilterSet, PagedFetcher};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(Path::new("records.db")).await?;
//!     let fetcher = PagedFetcher::with_config(db, FetchConfig::default())?;
//!
//!     // Subscribe to events
//!     let mut events = fetcher.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let filters = FilterSet::new().with("collection", "invoices");
//!     let records = fetcher.fetch_all(filters, 500).await?;
//!     println!("fetched {} records", records.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// SQLite record store
pub mod db;
/// Error types
pub mod error;
/// Concurrent paginated fetch engine
pub mod pager;
/// Record store abstraction
pub mod store;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, FetchConfig, PersistenceConfig};
pub use db::{Database, NewRecord, StoredRecord};
pub use error::{DatabaseError, Error, Result, StoreError, StoreResult};
pub use pager::{PagedFetcher, fetch_all_paged, plan_page_count, plan_pages};
pub use store::RecordStore;
pub use types::{Event, FetchSummary, FilterSet, FilterValue, PageDescriptor, PageOutcome};
