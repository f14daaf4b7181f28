//! Queue Scenario Tests
//!
//! Blocking, draining and accounting behaviour of BoundedQueue with real tasks

use asyncq_core::domain::{BoundedQueue, QueueError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Scenario 1: capacity 2, producer puts A, B, C and blocks on C until a consumer frees a slot
#[tokio::test]
async fn test_third_put_waits_for_first_get() {
    let queue = Arc::new(BoundedQueue::new(2));

    let producer_queue = Arc::clone(&queue);
    let producer = tokio::spawn(async move {
        for token in ["A", "B", "C"] {
            producer_queue.put(token).await.unwrap();
        }
    });

    // Let the producer fill the queue and park on C
    while queue.len() < 2 {
        tokio::task::yield_now().await;
    }
    tokio::task::yield_now().await;
    assert!(!producer.is_finished(), "C must wait for a free slot");
    assert_eq!(queue.outstanding(), 2);

    let a = queue.get().await.unwrap();
    assert_eq!(*a.payload(), "A");
    queue.mark_done().unwrap();

    tokio::time::timeout(Duration::from_secs(1), producer)
        .await
        .expect("C should be accepted once A is taken")
        .unwrap();
    assert_eq!(queue.outstanding(), 2);

    for expected in ["B", "C"] {
        let item = queue.get().await.unwrap();
        assert_eq!(*item.payload(), expected);
        queue.mark_done().unwrap();
    }

    tokio::time::timeout(Duration::from_secs(1), queue.join())
        .await
        .expect("join should return once all three items are done");
    assert_eq!(queue.outstanding(), 0);
}

/// Scenario 2: N puts and N (get, mark_done) pairs from many tasks always unblock join
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_join_unblocks_under_contention() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 50;
    const CONSUMERS: usize = 6;
    const CAPACITY: usize = 4;

    let queue = Arc::new(BoundedQueue::new(CAPACITY));

    let mut consumers = JoinSet::new();
    for _ in 0..CONSUMERS {
        let queue = Arc::clone(&queue);
        consumers.spawn(async move {
            let mut seen = Vec::new();
            loop {
                match queue.get().await {
                    Ok(item) => {
                        seen.push(item.into_payload());
                        queue.mark_done().unwrap();
                    }
                    Err(QueueError::Closed) => return seen,
                    Err(e) => panic!("unexpected queue error: {e}"),
                }
            }
        });
    }

    let mut producers = JoinSet::new();
    for p in 0..PRODUCERS {
        let queue = Arc::clone(&queue);
        producers.spawn(async move {
            for i in 0..PER_PRODUCER {
                queue.put(p * PER_PRODUCER + i).await.unwrap();
                assert!(queue.len() <= CAPACITY, "queue exceeded capacity");
            }
        });
    }

    // Same order as the controller: producers first, then the drain
    while let Some(result) = producers.join_next().await {
        result.unwrap();
    }
    tokio::time::timeout(Duration::from_secs(10), queue.join())
        .await
        .expect("join should unblock once every item is done");
    assert_eq!(queue.outstanding(), 0);
    queue.close();

    let mut all = Vec::new();
    while let Some(result) = consumers.join_next().await {
        all.extend(result.unwrap());
    }

    assert_eq!(all.len(), PRODUCERS * PER_PRODUCER);
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len(), "No item may be delivered twice");
}

/// Scenario 3: a parked join resumes on the final mark_done
#[tokio::test]
async fn test_parked_join_resumes_on_drain() {
    let queue = Arc::new(BoundedQueue::new(1));
    queue.put(1u8).await.unwrap();

    let waiter_queue = Arc::clone(&queue);
    let waiter = tokio::spawn(async move { waiter_queue.join().await });
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    queue.get().await.unwrap();
    queue.mark_done().unwrap();

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("join should observe the drain")
        .unwrap();
}

/// Scenario 4: extra mark_done after a full drain is rejected and leaves the count at zero
#[tokio::test]
async fn test_imbalanced_done_after_drain() {
    let queue = BoundedQueue::new(2);
    queue.put("x").await.unwrap();
    queue.get().await.unwrap();
    queue.mark_done().unwrap();

    assert_eq!(queue.mark_done(), Err(QueueError::ImbalancedDone));
    assert_eq!(queue.outstanding(), 0);
    queue.join().await;
}
