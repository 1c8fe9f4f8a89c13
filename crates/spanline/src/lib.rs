//! # Spanline
//!
//! A bounded, concurrent batch ingestion processor for telemetry pipelines.
//!
//! Applications that emit telemetry (traces, spans, scores, events) should
//! not pay network latency on the hot path. Spanline decouples producers
//! from a slow delivery sink: records are accepted onto a bounded queue,
//! accumulated into batches by a single collector task, and delivered by a
//! pool of sender workers through an injected [`BatchSender`].
//!
//! ## Features
//!
//! - **Generic records**: the processor batches any `T: Send + 'static`
//! - **Size and time triggers**: batches are cut at `max_batch_size` or
//!   every `flush_interval`, whichever comes first
//! - **Explicit backpressure**: [`BatchProcessor::submit`] never blocks; a
//!   saturated queue returns [`Error::BufferFull`]
//! - **Graceful shutdown**: [`BatchProcessor::close`] drains every accepted
//!   record, bounded by `shutdown_timeout`
//!
//! ## Ordering
//!
//! Records appear in submission order within a batch. With
//! `num_workers > 1`, batches may be *delivered* out of the order they were
//! cut; keep the default single worker if the backend requires strict
//! ordering.
//!
//! ## Example
//!
//! ```no_run
//! use spanline::{BatchConfig, BatchProcessor, BatchSender, Result};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! struct PrintSender;
//!
//! #[async_trait]
//! impl BatchSender<String> for PrintSender {
//!     async fn send_batch(&self, batch: Vec<String>) -> Result<()> {
//!         println!("shipping {} records", batch.len());
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let processor = BatchProcessor::with_config(
//!         PrintSender,
//!         BatchConfig::new()
//!             .with_max_batch_size(50)
//!             .with_flush_interval(Duration::from_secs(1)),
//!     );
//!
//!     processor.submit("trace.end".to_string())?;
//!     processor.flush();
//!     processor.close().await
//! }
//! ```

mod config;
mod error;
mod processor;
mod sender;

pub use config::{
    BatchConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_BATCH_SIZE, DEFAULT_NUM_WORKERS,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use error::{Error, Result};
pub use processor::BatchProcessor;
pub use sender::BatchSender;
