//! Error types for the batch processor

use std::time::Duration;
use thiserror::Error;

/// Error type for batch processor operations
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// The processor has begun shutdown and no longer accepts records
    #[error("processor is closed")]
    Closed,

    /// The submission buffer is at capacity; backpressure signal to the caller
    #[error("submission buffer is full")]
    BufferFull,

    /// Graceful shutdown did not complete within the configured bound.
    ///
    /// Background tasks are not cancelled; shutdown keeps proceeding after
    /// this error is observed.
    #[error("shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    /// A sender failed to deliver a batch to the external system
    #[error("batch delivery failed: {0}")]
    Delivery(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for batch processor operations
pub type Result<T> = std::result::Result<T, Error>;
