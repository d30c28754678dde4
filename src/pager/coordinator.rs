//! Fetch coordination: count, plan, fan out one task per page, wait for all, merge.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::{Semaphore, broadcast};

use crate::config::{FetchConfig, validate_page_size};
use crate::error::{Error, Result};
use crate::store::RecordStore;
use crate::types::{Event, FetchSummary, FilterSet};

use super::aggregate::{LostTask, TaskResult, merge_outcomes};
use super::planner::plan_pages;
use super::task::{PageTaskParams, fetch_page};

/// Concurrent paginated fetcher over a [`RecordStore`].
///
/// Each call to [`fetch_all`](Self::fetch_all) counts the matching records,
/// spawns one task per page, waits for every task, and returns either all
/// records in page order or a single error. Page failures never cancel sibling
/// pages and partial results are never returned.
///
/// The concurrency limit (if any) is shared by every invocation on the same
/// fetcher, so it can be sized to the store's connection limit.
pub struct PagedFetcher<S: RecordStore> {
    store: Arc<S>,
    config: FetchConfig,
    limiter: Option<Arc<Semaphore>>,
    event_tx: broadcast::Sender<Event>,
}

impl<S: RecordStore> PagedFetcher<S> {
    /// Create a fetcher with the default [`FetchConfig`]
    pub fn new(store: S) -> Self {
        Self::build(Arc::new(store), FetchConfig::default())
    }

    /// Create a fetcher with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration does not validate.
    pub fn with_config(store: S, config: FetchConfig) -> Result<Self> {
        Self::from_shared(Arc::new(store), config)
    }

    /// Create a fetcher over a store that is already shared elsewhere
    pub fn from_shared(store: Arc<S>, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(store, config))
    }

    fn build(store: Arc<S>, config: FetchConfig) -> Self {
        let limiter = config
            .max_concurrent_pages
            .map(|limit| Arc::new(Semaphore::new(limit)));
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            store,
            config,
            limiter,
            event_tx,
        }
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The configuration this fetcher runs with
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch all matching records using the configured page size
    pub async fn fetch_all_with_default_page_size(
        &self,
        filters: FilterSet,
    ) -> Result<Vec<S::Record>> {
        self.fetch_all(filters, self.config.page_size).await
    }

    /// Fetch every record matching `filters`, `page_size` records per page.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if `page_size` is zero (before any I/O)
    /// - [`Error::CountFailed`] if the counting query fails (no pages fetched)
    /// - [`Error::PageFetchFailed`] / [`Error::TaskPanicked`] if any page failed,
    ///   after every page task has finished
    pub async fn fetch_all(&self, filters: FilterSet, page_size: usize) -> Result<Vec<S::Record>> {
        let result = self.run(filters, page_size).await;
        if let Err(e) = &result {
            self.event_tx
                .send(Event::Failed {
                    error: e.to_string(),
                })
                .ok();
        }
        result
    }

    async fn run(&self, filters: FilterSet, page_size: usize) -> Result<Vec<S::Record>> {
        validate_page_size(page_size)?;
        let started = Instant::now();

        let total_records = self
            .store
            .count_matching(&filters)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to count matching records");
                Error::CountFailed(e)
            })?;

        let pages = plan_pages(total_records, page_size)?;
        let page_count = pages.len() as u64;

        tracing::info!(
            total_records,
            page_count,
            page_size,
            filters = filters.len(),
            "Planned paged fetch"
        );
        self.event_tx
            .send(Event::CountCompleted {
                total_records,
                page_count,
            })
            .ok();

        if pages.is_empty() {
            self.complete(total_records, 0, 0, started);
            return Ok(Vec::new());
        }

        // Fan out: one task per page, all dispatched before any is awaited
        let filters = Arc::new(filters);
        let handles: Vec<_> = pages
            .into_iter()
            .map(|descriptor| {
                let handle = tokio::spawn(fetch_page(PageTaskParams {
                    store: Arc::clone(&self.store),
                    descriptor,
                    filters: Arc::clone(&filters),
                    limiter: self.limiter.clone(),
                    event_tx: self.event_tx.clone(),
                }));
                (descriptor.index, handle)
            })
            .collect();

        // Fan in: full barrier over every task, no short-circuit on failure
        let results: Vec<TaskResult<S::Record>> =
            join_all(handles.into_iter().map(|(index, handle)| async move {
                handle.await.map_err(|e| LostTask {
                    index,
                    reason: e.to_string(),
                })
            }))
            .await;

        let records = merge_outcomes(results)?;

        if records.len() as u64 != total_records {
            tracing::warn!(
                total_records,
                records_fetched = records.len(),
                "Fetched record count differs from counted total; store changed during fetch"
            );
        }

        self.complete(total_records, page_count, records.len(), started);
        Ok(records)
    }

    fn complete(&self, total_records: u64, page_count: u64, records_fetched: usize, started: Instant) {
        let summary = FetchSummary {
            total_records,
            page_count,
            records_fetched,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            total_records,
            page_count,
            records_fetched,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Paged fetch completed"
        );
        self.event_tx.send(Event::Completed(summary)).ok();
    }
}

/// One-off paged fetch with the default [`FetchConfig`].
///
/// Equivalent to `PagedFetcher::new(store).fetch_all(filters, page_size)`.
pub async fn fetch_all_paged<S: RecordStore>(
    store: S,
    filters: FilterSet,
    page_size: usize,
) -> Result<Vec<S::Record>> {
    PagedFetcher::new(store).fetch_all(filters, page_size).await
}
