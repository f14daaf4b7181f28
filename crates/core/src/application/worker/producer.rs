// Producer - puts a random quota of items after random delays

use super::constants::DEFAULT_MAX_ITEMS_PER_PRODUCER;
use super::DelayPolicy;
use crate::application::report::ProducerReport;
use crate::domain::BoundedQueue;
use crate::error::Result;
use crate::port::PayloadSource;
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub struct Producer<S: PayloadSource> {
    id: usize,
    queue: Arc<BoundedQueue<S::Payload>>,
    source: S,
    max_items: usize,
    delay: DelayPolicy,
    rng: StdRng,
}

impl<S> Producer<S>
where
    S: PayloadSource,
    S::Payload: Display,
{
    pub fn new(id: usize, queue: Arc<BoundedQueue<S::Payload>>, source: S, rng: StdRng) -> Self {
        Self {
            id,
            queue,
            source,
            max_items: DEFAULT_MAX_ITEMS_PER_PRODUCER,
            delay: DelayPolicy::default(),
            rng,
        }
    }

    /// Upper bound (inclusive) of the random quota; at least one item is always produced
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items.max(1);
        self
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Produce the whole quota, then return.
    ///
    /// Stops early with `QueueError::Closed` if the queue is shut down mid-run.
    pub async fn run(mut self) -> Result<ProducerReport> {
        let quota = self.rng.gen_range(1..=self.max_items);
        let mut report = ProducerReport {
            producer: self.id,
            quota,
            produced: 0,
        };
        debug!(producer = self.id, quota, "Producer started");

        for _ in 0..quota {
            let delay = self.delay.sample(&mut self.rng);
            debug!(producer = self.id, ?delay, "Producer sleeping");
            sleep(delay).await;

            let payload = self.source.next_payload();
            let label = payload.to_string();
            if let Err(e) = self.queue.put(payload).await {
                warn!(producer = self.id, item = %label, error = %e, "Producer stopping");
                return Err(e.into());
            }
            report.produced += 1;
            info!(producer = self.id, item = %label, "Producer added item to queue");
        }

        debug!(producer = self.id, produced = report.produced, "Producer finished");
        Ok(report)
    }
}
