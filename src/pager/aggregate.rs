//! Result aggregation: merges page outcomes in page order or picks the failure to surface.

use crate::error::{Error, Result, StoreError};
use crate::types::PageOutcome;

/// A page task that ended without reporting an outcome (panic or abort)
#[derive(Debug)]
pub(super) struct LostTask {
    pub(super) index: u64,
    pub(super) reason: String,
}

/// What the coordinator gets back from joining one page task
pub(super) type TaskResult<R> = std::result::Result<PageOutcome<R>, LostTask>;

enum PageFailure {
    Store(StoreError),
    Lost(String),
}

/// Merge every collected task result into the final record sequence.
///
/// Records are concatenated by page index, whatever order the tasks finished
/// in. If any page failed, the lowest failing page is surfaced and the rest are
/// logged; no records are returned.
pub(super) fn merge_outcomes<R>(mut results: Vec<TaskResult<R>>) -> Result<Vec<R>> {
    results.sort_by_key(|result| match result {
        Ok(outcome) => outcome.index,
        Err(lost) => lost.index,
    });

    let mut pages: Vec<Vec<R>> = Vec::with_capacity(results.len());
    let mut failures: Vec<(u64, PageFailure)> = Vec::new();

    for result in results {
        match result {
            Ok(PageOutcome {
                result: Ok(records),
                ..
            }) => pages.push(records),
            Ok(PageOutcome {
                index,
                result: Err(cause),
            }) => failures.push((index, PageFailure::Store(cause))),
            Err(LostTask { index, reason }) => failures.push((index, PageFailure::Lost(reason))),
        }
    }

    let failed_pages = failures.len();
    let mut failures = failures.into_iter();
    let Some((page_index, representative)) = failures.next() else {
        return Ok(pages.into_iter().flatten().collect());
    };

    for (index, failure) in failures {
        match failure {
            PageFailure::Store(cause) => {
                tracing::warn!(page_index = index, error = %cause, "Additional page failure");
            }
            PageFailure::Lost(reason) => {
                tracing::warn!(page_index = index, reason = %reason, "Additional page task lost");
            }
        }
    }

    Err(match representative {
        PageFailure::Store(source) => Error::PageFetchFailed {
            page_index,
            failed_pages,
            source,
        },
        PageFailure::Lost(reason) => {
            tracing::error!(page_index, reason = %reason, "Page task did not complete");
            Error::TaskPanicked { page_index }
        }
    })
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn merges_in_page_order_regardless_of_input_order() {
        let results: Vec<TaskResult<u32>> = vec![
            Ok(PageOutcome::success(2, vec![5])),
            Ok(PageOutcome::success(0, vec![1, 2])),
            Ok(PageOutcome::success(1, vec![3, 4])),
        ];

        assert_eq!(merge_outcomes(results).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_input_is_empty_success() {
        let results: Vec<TaskResult<u32>> = Vec::new();
        assert!(merge_outcomes(results).unwrap().is_empty());
    }

    #[test]
    fn any_failure_fails_the_whole_merge() {
        let results: Vec<TaskResult<u32>> = vec![
            Ok(PageOutcome::success(0, vec![1])),
            Ok(PageOutcome::failure(
                1,
                StoreError::Timeout(Duration::from_secs(1)),
            )),
            Ok(PageOutcome::success(2, vec![3])),
        ];

        match merge_outcomes(results) {
            Err(Error::PageFetchFailed {
                page_index,
                failed_pages,
                source,
            }) => {
                assert_eq!(page_index, 1);
                assert_eq!(failed_pages, 1);
                assert_eq!(source, StoreError::Timeout(Duration::from_secs(1)));
            }
            other => panic!("expected page failure, got {other:?}"),
        }
    }

    #[test]
    fn lowest_failing_page_is_representative_and_all_are_counted() {
        let results: Vec<TaskResult<u32>> = vec![
            Ok(PageOutcome::failure(3, StoreError::Query("third".into()))),
            Ok(PageOutcome::success(0, vec![1])),
            Ok(PageOutcome::failure(1, StoreError::Query("first".into()))),
            Ok(PageOutcome::failure(2, StoreError::Query("second".into()))),
        ];

        match merge_outcomes(results) {
            Err(Error::PageFetchFailed {
                page_index,
                failed_pages,
                source,
            }) => {
                assert_eq!(page_index, 1);
                assert_eq!(failed_pages, 3);
                assert_eq!(source, StoreError::Query("first".into()));
            }
            other => panic!("expected page failure, got {other:?}"),
        }
    }

    #[test]
    fn lost_task_surfaces_as_task_panicked() {
        let results: Vec<TaskResult<u32>> = vec![
            Ok(PageOutcome::success(1, vec![1])),
            Err(LostTask {
                index: 0,
                reason: "panicked".into(),
            }),
        ];

        match merge_outcomes(results) {
            Err(Error::TaskPanicked { page_index }) => assert_eq!(page_index, 0),
            other => panic!("expected lost task, got {other:?}"),
        }
    }

    #[test]
    fn store_failure_below_lost_task_wins() {
        let results: Vec<TaskResult<u32>> = vec![
            Err(LostTask {
                index: 2,
                reason: "panicked".into(),
            }),
            Ok(PageOutcome::failure(0, StoreError::Other("down".into()))),
        ];

        let err = merge_outcomes(results).unwrap_err();
        assert_eq!(err.page_index(), Some(0));
        assert_eq!(err.error_code(), "page_fetch_failed");
    }
}
