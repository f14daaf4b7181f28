// asyncq Core - Bounded work queue, workers and shutdown orchestration
// NO presentation dependencies: logging setup and CLI live in the harness

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
