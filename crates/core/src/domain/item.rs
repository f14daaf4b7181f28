// Work Item Domain Model

use std::time::Duration;
use tokio::time::Instant;

/// A payload paired with the instant the queue accepted it.
///
/// Items are created only by [`BoundedQueue`](super::BoundedQueue) at
/// insertion time, so `accepted_at` always reflects queue admission rather
/// than the moment the producer started waiting.
#[derive(Debug, Clone)]
pub struct WorkItem<T> {
    payload: T,
    accepted_at: Instant,
}

impl<T> WorkItem<T> {
    pub(crate) fn new(payload: T, accepted_at: Instant) -> Self {
        Self {
            payload,
            accepted_at,
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn accepted_at(&self) -> Instant {
        self.accepted_at
    }

    /// Time spent between queue admission and now
    pub fn latency(&self) -> Duration {
        self.accepted_at.elapsed()
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}
