//! Error types for the ingestion client

use thiserror::Error;

/// Error type for ingestion operations
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid client configuration
    #[error("invalid ingestion client configuration: {0}")]
    Configuration(String),

    /// Transport-level failure (connection, timeout, serialization)
    #[error("ingestion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the batch
    #[error("backend returned {status}: {message}")]
    Backend {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body snippet, if any
        message: String,
    },

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;
