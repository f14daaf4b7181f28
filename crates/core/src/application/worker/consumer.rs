// Consumer - drains the queue until cancelled

use super::shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use super::DelayPolicy;
use crate::application::report::ConsumerReport;
use crate::domain::{BoundedQueue, QueueError};
use crate::error::{AppError, Result};
use rand::rngs::StdRng;
use std::fmt::Display;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

pub struct Consumer<T> {
    id: usize,
    queue: Arc<BoundedQueue<T>>,
    delay: DelayPolicy,
    rng: StdRng,
}

impl<T> Consumer<T>
where
    T: Display + Send + 'static,
{
    pub fn new(id: usize, queue: Arc<BoundedQueue<T>>, rng: StdRng) -> Self {
        Self {
            id,
            queue,
            delay: DelayPolicy::default(),
            rng,
        }
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Consume items until `shutdown` fires or the queue is closed and empty.
    ///
    /// Shutdown is honoured during the delay and while parked in `get`.
    /// Between a successful `get` and its `mark_done` there is no await,
    /// so neither cancellation nor a task abort can split the pair.
    pub async fn run(mut self, mut shutdown: ShutdownToken) -> Result<ConsumerReport> {
        let mut report = ConsumerReport::new(self.id);
        debug!(consumer = self.id, "Consumer started");

        loop {
            let delay = self.delay.sample(&mut self.rng);
            debug!(consumer = self.id, ?delay, "Consumer sleeping");
            if shutdown.guard(sleep(delay)).await.is_err() {
                break;
            }

            let item = match shutdown.guard(self.queue.get()).await {
                Ok(Ok(item)) => item,
                Ok(Err(QueueError::Closed)) => {
                    debug!(consumer = self.id, "Queue closed, consumer exiting");
                    break;
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(AppError::CancellationRequested) => break,
                Err(e) => return Err(e),
            };

            let latency = item.latency();
            info!(
                consumer = self.id,
                item = %item.payload(),
                latency_ms = latency.as_secs_f64() * 1000.0,
                "Consumer got item"
            );
            report.record(latency);
            self.queue.mark_done()?;
        }

        debug!(consumer = self.id, consumed = report.consumed, "Consumer cancelled");
        Ok(report)
    }

    /// Spawn this consumer on the runtime with its own cancellation channel
    pub fn spawn(self) -> ConsumerHandle {
        let (cancel, token) = shutdown_channel();
        let id = self.id;
        let task = tokio::spawn(self.run(token));
        ConsumerHandle { id, cancel, task }
    }
}

/// Controller-side handle for one spawned consumer
pub struct ConsumerHandle {
    id: usize,
    cancel: ShutdownSender,
    task: JoinHandle<Result<ConsumerReport>>,
}

impl ConsumerHandle {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Request cooperative cancellation; does not wait for acknowledgment
    pub fn cancel(&self) {
        self.cancel.shutdown();
    }

    /// Wait for the consumer to exit
    pub async fn join(self) -> Result<ConsumerReport> {
        self.task.await?
    }

    /// Wait for the consumer to exit until `deadline`, then abort it.
    ///
    /// An aborted consumer yields `AppError::CancellationRequested`.
    pub async fn finish(mut self, deadline: Instant) -> Result<ConsumerReport> {
        match tokio::time::timeout_at(deadline, &mut self.task).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!(consumer = self.id, "Consumer did not acknowledge cancellation, aborting");
                self.task.abort();
                Err(AppError::CancellationRequested)
            }
        }
    }
}
