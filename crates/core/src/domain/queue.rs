// Bounded Work Queue
//
// All state lives behind one mutex that is never held across an await.
// Waiters park on `Notify` and always register (`enable`) before inspecting
// state, so a change made between the check and the await cannot be missed.

use super::error::{QueueError, Result};
use super::item::WorkItem;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, error};

struct QueueState<T> {
    items: VecDeque<WorkItem<T>>,
    /// Accepted but not yet marked done (queued + in flight)
    unfinished: usize,
    closed: bool,
}

impl<T> QueueState<T> {
    fn in_flight(&self) -> usize {
        self.unfinished - self.items.len()
    }
}

/// FIFO queue with a fixed capacity and drain tracking.
///
/// Every successful `put` adds one to the outstanding count; every
/// `mark_done` removes one. `join` resolves once the count reaches zero.
///
/// A capacity of `0` makes the queue unbounded.
pub struct BoundedQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    not_empty: Notify,
    not_full: Notify,
    drained: Notify,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                unfinished: 0,
                closed: false,
            }),
            not_empty: Notify::new(),
            not_full: Notify::new(),
            drained: Notify::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Configured capacity, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        (self.capacity > 0).then_some(self.capacity)
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        let state = self.state();
        !self.has_room(&state)
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Items accepted but not yet marked done
    pub fn outstanding(&self) -> usize {
        self.state().unfinished
    }

    /// Items retrieved by a consumer but not yet marked done
    pub fn in_flight(&self) -> usize {
        self.state().in_flight()
    }

    /// Append `payload` at the tail, waiting while the queue is full.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the queue
    /// untouched.
    pub async fn put(&self, payload: T) -> Result<()> {
        loop {
            let notified = self.not_full.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state();
                if state.closed {
                    return Err(QueueError::Closed);
                }
                if self.has_room(&state) {
                    self.push_locked(&mut state, payload);
                    return Ok(());
                }
            }

            notified.await;
        }
    }

    /// Non-blocking `put`
    pub fn try_put(&self, payload: T) -> Result<()> {
        let mut state = self.state();
        if state.closed {
            return Err(QueueError::Closed);
        }
        if !self.has_room(&state) {
            return Err(QueueError::Full(self.capacity));
        }
        self.push_locked(&mut state, payload);
        Ok(())
    }

    pub async fn put_timeout(&self, payload: T, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.put(payload))
            .await
            .map_err(|_| QueueError::Timeout(timeout))?
    }

    /// Remove and return the head item, waiting while the queue is empty.
    ///
    /// Items still queued at close time are handed out; once the queue is
    /// closed and empty this fails with [`QueueError::Closed`].
    /// Cancel-safe: an item is only removed when the future resolves.
    pub async fn get(&self) -> Result<WorkItem<T>> {
        loop {
            let notified = self.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state();
                if let Some(item) = self.pop_locked(&mut state) {
                    return Ok(item);
                }
                if state.closed {
                    return Err(QueueError::Closed);
                }
            }

            notified.await;
        }
    }

    /// Non-blocking `get`
    pub fn try_get(&self) -> Result<WorkItem<T>> {
        let mut state = self.state();
        match self.pop_locked(&mut state) {
            Some(item) => Ok(item),
            None if state.closed => Err(QueueError::Closed),
            None => Err(QueueError::Empty),
        }
    }

    pub async fn get_timeout(&self, timeout: Duration) -> Result<WorkItem<T>> {
        tokio::time::timeout(timeout, self.get())
            .await
            .map_err(|_| QueueError::Timeout(timeout))?
    }

    /// Signal that one retrieved item has been fully processed.
    pub fn mark_done(&self) -> Result<()> {
        let mut state = self.state();
        if state.in_flight() == 0 {
            error!(
                outstanding = state.unfinished,
                queued = state.items.len(),
                "mark_done called with no item in flight"
            );
            return Err(QueueError::ImbalancedDone);
        }

        state.unfinished -= 1;
        let drained = state.unfinished == 0;
        drop(state);

        if drained {
            debug!("Queue drained");
            self.drained.notify_waiters();
        }
        Ok(())
    }

    /// Wait until every accepted item has been retrieved and marked done.
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.state().unfinished == 0 {
                return;
            }

            notified.await;
        }
    }

    /// Refuse further puts and wake every parked putter and getter.
    pub fn close(&self) {
        let mut state = self.state();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);

        debug!("Queue closed");
        self.not_full.notify_waiters();
        self.not_empty.notify_waiters();
    }

    fn state(&self) -> MutexGuard<'_, QueueState<T>> {
        // Critical sections never panic midway, so a poisoned state is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn has_room(&self, state: &QueueState<T>) -> bool {
        self.capacity == 0 || state.items.len() < self.capacity
    }

    fn push_locked(&self, state: &mut QueueState<T>, payload: T) {
        state
            .items
            .push_back(WorkItem::new(payload, Instant::now()));
        state.unfinished += 1;
        self.not_empty.notify_one();
    }

    fn pop_locked(&self, state: &mut QueueState<T>) -> Option<WorkItem<T>> {
        let item = state.items.pop_front()?;
        self.not_full.notify_one();
        Some(item)
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}
