// Domain Layer - Queue, items and their errors

pub mod error;
pub mod item;
pub mod queue;

// Re-exports
pub use error::QueueError;
pub use item::WorkItem;
pub use queue::BoundedQueue;
