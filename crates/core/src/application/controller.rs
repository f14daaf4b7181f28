// Controller - spawns workers, waits for drain, cancels consumers

use crate::application::report::RunReport;
use crate::application::worker::constants::*;
use crate::application::worker::{
    worker_rng, Consumer, ConsumerHandle, DelayPolicy, Producer, WorkerRole,
};
use crate::domain::BoundedQueue;
use crate::error::{AppError, Result};
use crate::port::{HexTokenSource, PayloadSource};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub producers: usize,
    pub consumers: usize,
    /// Queue capacity, 0 for unbounded
    pub capacity: usize,
    pub max_items_per_producer: usize,
    /// Upper bound of every worker's random delay
    pub max_delay: Duration,
    /// Seed for reproducible runs; `None` seeds every worker from OS entropy
    pub seed: Option<u64>,
    /// Give up waiting for the drain after this long
    pub drain_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            capacity: DEFAULT_QUEUE_CAPACITY,
            max_items_per_producer: DEFAULT_MAX_ITEMS_PER_PRODUCER,
            max_delay: DEFAULT_MAX_DELAY,
            seed: None,
            drain_timeout: None,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_items_per_producer == 0 {
            return Err(AppError::Config(
                "max_items_per_producer must be at least 1".to_string(),
            ));
        }
        if self.producers > 0 && self.consumers == 0 {
            return Err(AppError::Config(
                "at least one consumer is required when producers are configured".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct Controller {
    config: ControllerConfig,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run the pipeline with random hex tokens as payloads
    pub async fn run(self) -> Result<RunReport> {
        let seed = self.config.seed;
        self.run_with_source(move |id| {
            HexTokenSource::new(worker_rng(seed, WorkerRole::Payload, id))
        })
        .await
    }

    /// Run the pipeline, building one payload source per producer index.
    ///
    /// Order of events: spawn everything, await every producer, await the
    /// drain, then cancel consumers. Consumers are only cancelled once the
    /// outstanding count is zero, so none can be holding an item.
    pub async fn run_with_source<S, F>(self, mut make_source: F) -> Result<RunReport>
    where
        S: PayloadSource + 'static,
        S::Payload: Display,
        F: FnMut(usize) -> S,
    {
        let config = self.config;
        config.validate()?;

        let started = Instant::now();
        let queue = Arc::new(BoundedQueue::new(config.capacity));
        let delay = DelayPolicy::new(config.max_delay);
        info!(
            producers = config.producers,
            consumers = config.consumers,
            capacity = config.capacity,
            "Starting pipeline"
        );

        let mut producers = JoinSet::new();
        for id in 0..config.producers {
            let producer = Producer::new(
                id,
                Arc::clone(&queue),
                make_source(id),
                worker_rng(config.seed, WorkerRole::Producer, id),
            )
            .with_max_items(config.max_items_per_producer)
            .with_delay(delay);
            producers.spawn(producer.run());
        }

        let consumers: Vec<ConsumerHandle> = (0..config.consumers)
            .map(|id| {
                Consumer::new(
                    id,
                    Arc::clone(&queue),
                    worker_rng(config.seed, WorkerRole::Consumer, id),
                )
                .with_delay(delay)
                .spawn()
            })
            .collect();

        let mut report = RunReport {
            producers: config.producers,
            consumers: config.consumers,
            ..Default::default()
        };

        while let Some(joined) = producers.join_next().await {
            match joined.map_err(AppError::from).and_then(|outcome| outcome) {
                Ok(producer) => report.add_producer(producer),
                Err(e) => {
                    warn!(error = %e, "Producer terminated early");
                    report.failed_producers += 1;
                }
            }
        }
        info!(
            produced = report.produced,
            outstanding = queue.outstanding(),
            "All producers finished, waiting for queue to drain"
        );

        let drained = match config.drain_timeout {
            Some(limit) => tokio::time::timeout(limit, queue.join()).await.is_ok(),
            None => {
                queue.join().await;
                true
            }
        };

        for consumer in &consumers {
            consumer.cancel();
        }
        let deadline = Instant::now() + CONSUMER_SHUTDOWN_GRACE;
        for consumer in consumers {
            let id = consumer.id();
            match consumer.finish(deadline).await {
                Ok(consumed) => report.add_consumer(consumed),
                Err(e) => {
                    if !e.is_cancellation() {
                        error!(consumer = id, error = %e, "Consumer failed");
                    }
                    report.failed_consumers += 1;
                }
            }
        }
        queue.close();

        if let (false, Some(limit)) = (drained, config.drain_timeout) {
            warn!(
                outstanding = queue.outstanding(),
                "Queue did not drain in time"
            );
            return Err(AppError::DrainTimeout(limit));
        }

        report.finish(started.elapsed());
        info!(
            produced = report.produced,
            consumed = report.consumed,
            elapsed_ms = report.elapsed_ms,
            "Pipeline complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(producers: usize, consumers: usize) -> ControllerConfig {
        ControllerConfig {
            producers,
            consumers,
            capacity: 2,
            max_items_per_producer: 3,
            max_delay: Duration::ZERO,
            seed: Some(444),
            drain_timeout: Some(Duration::from_secs(5)),
        }
    }

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.producers, 5);
        assert_eq!(config.consumers, 10);
        assert_eq!(config.max_delay, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_quota() {
        let config = ControllerConfig {
            max_items_per_producer: 0,
            ..quick_config(1, 1)
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_items_per_producer"));
    }

    #[test]
    fn test_validate_rejects_producers_without_consumers() {
        let err = quick_config(2, 0).validate().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(quick_config(0, 0).validate().is_ok());
    }

    #[tokio::test]
    async fn test_run_accounts_for_every_item() {
        let report = Controller::new(quick_config(3, 2)).run().await.unwrap();

        assert_eq!(report.failed_producers, 0);
        assert_eq!(report.failed_consumers, 0);
        assert_eq!(report.produced, report.consumed);
        let quota: usize = report.producer_reports.iter().map(|p| p.quota).sum();
        assert_eq!(report.produced, quota);
        assert_eq!(report.consumer_reports.len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_runs_agree_on_quotas() {
        let quotas = |report: RunReport| {
            report
                .producer_reports
                .iter()
                .map(|p| p.quota)
                .collect::<Vec<_>>()
        };
        let first = Controller::new(quick_config(4, 2)).run().await.unwrap();
        let second = Controller::new(quick_config(4, 2)).run().await.unwrap();
        assert_eq!(quotas(first), quotas(second));
    }

    #[tokio::test]
    async fn test_custom_payload_source() {
        let report = Controller::new(quick_config(2, 1))
            .run_with_source(|producer| {
                let mut n = 0;
                move || {
                    n += 1;
                    format!("p{producer}-{n}")
                }
            })
            .await
            .unwrap();
        assert_eq!(report.produced, report.consumed);
    }
}
