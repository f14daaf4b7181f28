// Workers - Producer and consumer loops around a shared BoundedQueue

pub mod constants;
pub mod consumer;
pub mod producer;
mod shutdown;

pub use consumer::{Consumer, ConsumerHandle};
pub use producer::Producer;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Owner of a seeded random stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    Producer,
    Consumer,
    /// Stream reserved for a producer's payload source
    Payload,
}

/// Build the private random source for one worker.
///
/// With a seed, each (role, index) pair gets its own reproducible stream;
/// without one, the generator is seeded from OS entropy.
pub fn worker_rng(seed: Option<u64>, role: WorkerRole, index: usize) -> StdRng {
    match seed {
        Some(seed) => {
            let role_bits: u64 = match role {
                WorkerRole::Producer => 0,
                WorkerRole::Consumer => 1 << 63,
                WorkerRole::Payload => 1 << 62,
            };
            let stream = seed
                .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                .wrapping_add(role_bits | index as u64);
            StdRng::seed_from_u64(stream)
        }
        None => StdRng::from_entropy(),
    }
}

/// Uniform random delay in `0..=max`, millisecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    max: Duration,
}

impl DelayPolicy {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }

    /// No delay at all (useful for tests and throughput runs)
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.gen_range(0..=max_ms))
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MAX_DELAY)
    }
}
