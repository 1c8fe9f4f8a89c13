//! # Spanline Ingest
//!
//! HTTP ingestion sender for the [`spanline`] batch processor.
//!
//! Wraps an observability backend's batch ingestion endpoint: events are
//! posted as `{"batch": [...]}` with a generic `{id, type, timestamp, body}`
//! envelope per event. The client implements
//! [`BatchSender`](spanline::BatchSender), so delivery failures are logged
//! by the processor's workers and never reach submitters.
//!
//! ## Example
//!
//! ```no_run
//! use serde_json::json;
//! use spanline::{BatchConfig, BatchProcessor};
//! use spanline_ingest::{IngestClient, IngestionEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IngestClient::builder()
//!         .endpoint("https://telemetry.example.com/api/ingestion")
//!         .build()?;
//!
//!     let processor = BatchProcessor::with_config(
//!         client,
//!         BatchConfig::new().with_max_batch_size(50),
//!     );
//!
//!     processor.submit(IngestionEvent::new(
//!         "trace-create",
//!         json!({"name": "checkout", "user_id": "u-42"}),
//!     ))?;
//!
//!     processor.close().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod event;

pub use client::{IngestClient, IngestClientBuilder, DEFAULT_REQUEST_TIMEOUT};
pub use error::{Error, Result};
pub use event::IngestionEvent;
