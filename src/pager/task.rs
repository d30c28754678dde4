//! Page fetch task: fetches exactly one page from the store and reports its outcome.

use std::sync::Arc;

use tokio::sync::{Semaphore, broadcast};

use crate::error::StoreError;
use crate::store::RecordStore;
use crate::types::{Event, FilterSet, PageDescriptor, PageOutcome};

/// Parameters for fetching a single page
pub(super) struct PageTaskParams<S: RecordStore> {
    /// Store shared by every page task of the invocation
    pub(super) store: Arc<S>,
    /// The page this task owns
    pub(super) descriptor: PageDescriptor,
    /// Filters shared read-only by every page task
    pub(super) filters: Arc<FilterSet>,
    /// Concurrency limiter; `None` means the store call starts immediately
    pub(super) limiter: Option<Arc<Semaphore>>,
    /// Progress event channel
    pub(super) event_tx: broadcast::Sender<Event>,
}

/// Fetch one page and report it as a [`PageOutcome`].
///
/// Never returns early on behalf of a sibling: each task runs its store call to
/// completion. A store error becomes a failed outcome tagged with the page index.
pub(super) async fn fetch_page<S: RecordStore>(params: PageTaskParams<S>) -> PageOutcome<S::Record> {
    let PageTaskParams {
        store,
        descriptor,
        filters,
        limiter,
        event_tx,
    } = params;
    let page_index = descriptor.index;

    // Held only across the store call
    let _permit = match limiter {
        Some(limiter) => match limiter.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                let cause = StoreError::Other("concurrency limiter closed".to_string());
                report_failure(&event_tx, page_index, &cause);
                return PageOutcome::failure(page_index, cause);
            }
        },
        None => None,
    };

    tracing::debug!(
        page_index,
        offset = descriptor.offset,
        limit = descriptor.size,
        "Fetching page"
    );

    match store
        .fetch_page(&filters, descriptor.size, descriptor.offset)
        .await
    {
        Ok(records) => {
            if records.len() > descriptor.size {
                tracing::warn!(
                    page_index,
                    returned = records.len(),
                    limit = descriptor.size,
                    "Store returned more records than the page limit"
                );
            }
            tracing::debug!(page_index, records = records.len(), "Page fetched");
            event_tx
                .send(Event::PageFetched {
                    page_index,
                    records: records.len(),
                })
                .ok();
            PageOutcome::success(page_index, records)
        }
        Err(cause) => {
            report_failure(&event_tx, page_index, &cause);
            PageOutcome::failure(page_index, cause)
        }
    }
}

fn report_failure(event_tx: &broadcast::Sender<Event>, page_index: u64, cause: &StoreError) {
    tracing::warn!(page_index, error = %cause, "Page fetch failed");
    event_tx
        .send(Event::PageFailed {
            page_index,
            error: cause.to_string(),
        })
        .ok();
}
