// Application Layer - Workers and pipeline orchestration

pub mod controller;
pub mod report;
pub mod worker;

// Re-exports
pub use controller::{Controller, ControllerConfig};
pub use report::{ConsumerReport, ProducerReport, RunReport};
pub use worker::{shutdown_channel, Consumer, ConsumerHandle, Producer, ShutdownSender, ShutdownToken};
