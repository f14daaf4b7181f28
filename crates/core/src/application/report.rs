// Run Reports - per-worker outcomes and the aggregated controller summary

use serde::Serialize;
use std::time::Duration;

fn as_millis_f64(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProducerReport {
    pub producer: usize,
    /// Items the producer set out to create
    pub quota: usize,
    /// Items actually accepted by the queue
    pub produced: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsumerReport {
    pub consumer: usize,
    pub consumed: usize,
    pub total_latency_ms: f64,
    pub max_latency_ms: f64,
}

impl ConsumerReport {
    pub fn new(consumer: usize) -> Self {
        Self {
            consumer,
            ..Default::default()
        }
    }

    pub fn record(&mut self, latency: Duration) {
        let ms = as_millis_f64(latency);
        self.consumed += 1;
        self.total_latency_ms += ms;
        self.max_latency_ms = self.max_latency_ms.max(ms);
    }
}

/// Summary of one controller run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub producers: usize,
    pub consumers: usize,
    pub produced: usize,
    pub consumed: usize,
    pub failed_producers: usize,
    /// Consumers that exited with an error or were aborted after the grace period
    pub failed_consumers: usize,
    pub mean_latency_ms: f64,
    pub max_latency_ms: f64,
    pub elapsed_ms: f64,
    pub producer_reports: Vec<ProducerReport>,
    pub consumer_reports: Vec<ConsumerReport>,
}

impl RunReport {
    pub(crate) fn add_producer(&mut self, report: ProducerReport) {
        self.produced += report.produced;
        self.producer_reports.push(report);
    }

    pub(crate) fn add_consumer(&mut self, report: ConsumerReport) {
        self.consumed += report.consumed;
        self.max_latency_ms = self.max_latency_ms.max(report.max_latency_ms);
        self.consumer_reports.push(report);
    }

    pub(crate) fn finish(&mut self, elapsed: Duration) {
        let total: f64 = self.consumer_reports.iter().map(|r| r.total_latency_ms).sum();
        self.mean_latency_ms = if self.consumed == 0 {
            0.0
        } else {
            total / self.consumed as f64
        };
        self.producer_reports.sort_by_key(|r| r.producer);
        self.consumer_reports.sort_by_key(|r| r.consumer);
        self.elapsed_ms = as_millis_f64(elapsed);
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_ms / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_report_tracks_max_and_total() {
        let mut report = ConsumerReport::new(2);
        report.record(Duration::from_millis(10));
        report.record(Duration::from_millis(30));

        assert_eq!(report.consumed, 2);
        assert_eq!(report.total_latency_ms, 40.0);
        assert_eq!(report.max_latency_ms, 30.0);
    }

    #[test]
    fn test_run_report_aggregates() {
        let mut run = RunReport::default();
        run.add_producer(ProducerReport { producer: 1, quota: 2, produced: 2 });
        run.add_producer(ProducerReport { producer: 0, quota: 1, produced: 1 });

        let mut a = ConsumerReport::new(0);
        a.record(Duration::from_millis(20));
        let mut b = ConsumerReport::new(1);
        b.record(Duration::from_millis(40));
        b.record(Duration::from_millis(60));
        run.add_consumer(b);
        run.add_consumer(a);
        run.finish(Duration::from_millis(1500));

        assert_eq!(run.produced, 3);
        assert_eq!(run.consumed, 3);
        assert_eq!(run.mean_latency_ms, 40.0);
        assert_eq!(run.max_latency_ms, 60.0);
        assert_eq!(run.producer_reports[0].producer, 0);
        assert_eq!(run.consumer_reports[0].consumer, 0);
        assert_eq!(run.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_run_report_serializes() {
        let mut run = RunReport::default();
        run.finish(Duration::ZERO);
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["mean_latency_ms"], 0.0);
        assert!(json["consumer_reports"].as_array().unwrap().is_empty());
    }
}
