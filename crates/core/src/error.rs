// Central Error Type for the Application

use std::time::Duration;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Queue error: {0}")]
    Queue(#[from] crate::domain::QueueError),

    /// Cooperative interrupt delivered at a suspension point
    #[error("Cancellation requested")]
    CancellationRequested,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Queue did not drain within {0:?}")]
    DrainTimeout(Duration),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AppError::CancellationRequested)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::WorkerPanicked(err.to_string())
        } else {
            AppError::CancellationRequested
        }
    }
}
