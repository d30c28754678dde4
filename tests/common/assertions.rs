//! Custom test assertions for integration tests

use paged_fetch::{Event, StoredRecord};
use std::time::Duration;
use tokio::sync::broadcast;

/// Drain every event currently buffered on `events`, waiting at most `timeout`
/// for the terminal `Completed`/`Failed` event
pub async fn collect_until_terminal(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
) -> Vec<Event> {
    let mut collected = Vec::new();

    let _ = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let terminal = matches!(event, Event::Completed(_) | Event::Failed { .. });
                    collected.push(event);
                    if terminal {
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    })
    .await;

    collected
}

/// Assert that records are in strictly increasing id order (page order, no duplicates)
pub fn assert_strictly_ordered(records: &[StoredRecord]) {
    for pair in records.windows(2) {
        assert!(
            pair[0].id < pair[1].id,
            "records out of order: id {} followed by id {}",
            pair[0].id,
            pair[1].id
        );
    }
}
