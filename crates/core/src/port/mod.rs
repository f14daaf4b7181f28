// Port Layer - Interfaces for pluggable dependencies

pub mod payload_source;

// Re-exports
pub use payload_source::{HexTokenSource, PayloadSource};
