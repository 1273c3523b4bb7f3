//! Test modules for the queue system
//!
//! Tests are organized by functional area for better maintainability.


use crate::queue::DynamicQueue;
use tokio::time::{sleep, timeout, Duration};

/// Wait until every sent item has passed the intake worker
///
/// `size()` does not count items still sitting on the inbound port, so
/// assertions on it need the intake worker to catch up first.
pub(super) async fn wait_for_size<T: Send + 'static>(queue: &DynamicQueue<T>, expected: usize) {
    let settled = timeout(Duration::from_secs(2), async {
        while queue.size() != expected {
            sleep(Duration::from_millis(1)).await;
        }
    })
    .await;

    assert!(
        settled.is_ok(),
        "Queue size should reach {}, stuck at {}",
        expected,
        queue.size()
    );
}
