// Queue Error Types

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is closed")]
    Closed,

    #[error("mark_done called more times than items were retrieved")]
    ImbalancedDone,

    #[error("Queue is full (capacity {0})")]
    Full(usize),

    #[error("Queue is empty")]
    Empty,

    #[error("Queue operation timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, QueueError>;
