//! Concurrent paginated fetch engine.
//!
//! Split into focused submodules:
//! - [`planner`] - Page count and page descriptors
//! - `task` - Single-page fetch task
//! - `coordinator` - Fan-out/fan-in over all pages
//! - `aggregate` - Page-ordered merge and failure selection

mod aggregate;
mod coordinator;
pub mod planner;
mod task;


pub use coordinator::{PagedFetcher, fetch_all_paged};
pub use planner::{plan_page_count, plan_pages};
