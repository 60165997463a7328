//! Lifecycle and expiry behavior of the pending work queues.

use readpress::{NextItem, PendingQueues};
use std::time::Duration;

#[tokio::test]
async fn batch_pops_in_order_and_drains() {
    let queues = PendingQueues::new();
    queues
        .create("q1", vec!["u2".to_string(), "u3".to_string()], 1, 3)
        .await;

    let first = queues.pop_next("q1").await.expect("first pop");
    assert_eq!(
        first,
        NextItem {
            url: "u2".to_string(),
            next_index: 3,
            total_count: 3,
            has_more: true,
        }
    );

    let second = queues.pop_next("q1").await.expect("second pop");
    assert_eq!(
        second,
        NextItem {
            url: "u3".to_string(),
            next_index: 4,
            total_count: 3,
            has_more: false,
        }
    );

    // Drained on the pop that emptied it, so the id now acts unknown.
    assert!(queues.pop_next("q1").await.is_none());
}

#[tokio::test]
async fn expired_batch_pops_empty() {
    let queues = PendingQueues::with_ttl(Duration::ZERO);
    queues
        .create("q1", vec!["u1".to_string(), "u2".to_string()], 0, 2)
        .await;

    assert!(queues.pop_next("q1").await.is_none());
    // The expired entry was removed, not just skipped.
    assert!(queues.pop_next("q1").await.is_none());
}

#[tokio::test]
async fn batch_expires_once_ttl_elapses() {
    let queues = PendingQueues::with_ttl(Duration::from_millis(100));
    queues
        .create("q1", vec!["u1".to_string(), "u2".to_string()], 0, 2)
        .await;

    // Within the TTL the batch pops normally.
    let item = queues.pop_next("q1").await.expect("pop before expiry");
    assert_eq!(item.url, "u1");
    assert!(item.has_more);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(queues.pop_next("q1").await.is_none());
}

#[tokio::test]
async fn ids_are_independent() {
    let queues = PendingQueues::new();
    queues.create("a", vec!["ua".to_string()], 0, 1).await;
    queues.create("b", vec!["ub".to_string()], 0, 1).await;

    let item = queues.pop_next("b").await.expect("pop b");
    assert_eq!(item.url, "ub");

    let item = queues.pop_next("a").await.expect("pop a");
    assert_eq!(item.url, "ua");
}
