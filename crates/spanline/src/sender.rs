//! The delivery capability injected into the processor

use crate::error::Result;
use async_trait::async_trait;

/// Delivers a completed batch to an external system.
///
/// This is the only collaborator a [`BatchProcessor`](crate::BatchProcessor)
/// depends on, and the only thing that needs mocking to test the processor
/// in isolation. Implementations receive ownership of a non-empty batch in
/// submission order and report success or failure for the batch as a whole.
///
/// The processor makes no assumptions about idempotency, partial success, or
/// retry: a failed delivery is logged by the calling worker and the batch is
/// discarded. Records are fire-and-forget from the submitter's perspective
/// once accepted.
///
/// No deadline is attached to `send_batch`; implementations own their own
/// timeouts (an HTTP sender should configure a request timeout on its
/// client). A send that stalls indefinitely will eventually stall the
/// collector through dispatch backpressure rather than losing batches
/// silently.
///
/// When the processor runs more than one worker, `send_batch` is invoked
/// concurrently and batches may arrive out of the order they were cut.
#[async_trait]
pub trait BatchSender<T>: Send + Sync {
    /// Attempt to deliver one batch. `batch` is never empty.
    async fn send_batch(&self, batch: Vec<T>) -> Result<()>;
}
