//! The batch processor: submission front door, collector loop, sender workers

use crate::config::BatchConfig;
use crate::error::{Error, Result};
use crate::sender::BatchSender;
use parking_lot::Mutex;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, warn};

/// Dispatch queue capacity, per worker.
///
/// Keeps a couple of completed batches in flight per worker while bounding
/// memory: once the dispatch queue is full, the collector blocks on hand-off
/// until a worker catches up.
const DISPATCH_DEPTH_PER_WORKER: usize = 2;

/// A bounded, concurrent, time-and-size-triggered batching engine.
///
/// Decouples record producers from a slow delivery sink: submissions land on
/// a bounded queue, a single collector task accumulates them into batches
/// (cut on size, timer, explicit [`flush`](Self::flush), or shutdown), and a
/// pool of sender workers delivers completed batches through the injected
/// [`BatchSender`]. Background tasks start in the constructor; there is no
/// separate start call.
///
/// Records accepted by [`submit`](Self::submit) appear in submission order
/// within a batch. With `num_workers > 1` batches may be *delivered* out of
/// the order they were cut; see
/// [`BatchConfig::with_num_workers`](crate::BatchConfig::with_num_workers).
///
/// # Example
///
/// ```rust,no_run
/// use spanline::{BatchConfig, BatchProcessor, BatchSender, Result};
/// use async_trait::async_trait;
///
/// struct StdoutSender;
///
/// #[async_trait]
/// impl BatchSender<String> for StdoutSender {
///     async fn send_batch(&self, batch: Vec<String>) -> Result<()> {
///         println!("delivering {} records", batch.len());
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let processor = BatchProcessor::with_config(
///         StdoutSender,
///         BatchConfig::new().with_max_batch_size(50),
///     );
///     processor.submit("span-ended".to_string())?;
///     processor.close().await
/// }
/// ```
pub struct BatchProcessor<T> {
    record_tx: mpsc::Sender<T>,
    flush_tx: mpsc::Sender<()>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    /// Collector and worker handles, taken by the first `close()`
    handles: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
    shutdown_timeout: Duration,
}

impl<T: Send + 'static> BatchProcessor<T> {
    /// Create a processor with default configuration.
    ///
    /// Spawns the collector and sender tasks immediately.
    #[must_use]
    pub fn new<S>(sender: S) -> Self
    where
        S: BatchSender<T> + 'static,
    {
        Self::with_config(sender, BatchConfig::default())
    }

    /// Create a processor with custom configuration.
    ///
    /// The configuration is [normalized](BatchConfig::normalized) first, so
    /// zero or unset values fall back to defaults.
    #[must_use]
    pub fn with_config<S>(sender: S, config: BatchConfig) -> Self
    where
        S: BatchSender<T> + 'static,
    {
        let config = config.normalized();

        let (record_tx, record_rx) = mpsc::channel::<T>(config.resolved_buffer_size());
        // Capacity 1: a pending flush request already guarantees a cut
        let (flush_tx, flush_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (batch_tx, batch_rx) =
            mpsc::channel::<Vec<T>>(config.num_workers * DISPATCH_DEPTH_PER_WORKER);

        let sender = Arc::new(sender);
        let mut handles = spawn_workers(config.num_workers, batch_rx, sender);
        handles.push(tokio::spawn(run_collector(
            record_rx,
            flush_rx,
            shutdown_rx,
            batch_tx,
            config.max_batch_size,
            config.flush_interval,
        )));

        Self {
            record_tx,
            flush_tx,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            handles: Mutex::new(handles),
            closed: AtomicBool::new(false),
            shutdown_timeout: config.shutdown_timeout,
        }
    }

    /// Submit one record for batched delivery.
    ///
    /// Non-blocking: the record is enqueued onto the bounded submission
    /// queue or rejected immediately. No network I/O happens here.
    ///
    /// # Errors
    ///
    /// - [`Error::Closed`] if shutdown has begun
    /// - [`Error::BufferFull`] if the submission queue is at capacity; a
    ///   backpressure signal the caller may handle by retrying, dropping,
    ///   or slowing down
    pub fn submit(&self, record: T) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        match self.record_tx.try_send(record) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(Error::BufferFull),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(Error::Closed),
        }
    }

    /// Request an out-of-band cut of any pending partial batch.
    ///
    /// Signals the collector and returns without waiting for delivery. A
    /// flush request already in flight covers this call, so there is nothing
    /// to report back.
    pub fn flush(&self) {
        match self.flush_tx.try_send(()) {
            // Full means a cut is already pending
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
            Err(mpsc::error::TrySendError::Closed(())) => {
                debug!("flush requested after shutdown; ignoring");
            }
        }
    }

    /// Gracefully shut down: drain queued records, flush the final partial
    /// batch, and wait for every in-flight delivery.
    ///
    /// Idempotent: only the first call performs shutdown; concurrent and
    /// subsequent calls return `Ok(())` immediately. After the first call
    /// begins, [`submit`](Self::submit) fails with [`Error::Closed`].
    ///
    /// # Errors
    ///
    /// [`Error::ShutdownTimeout`] if the collector and workers do not finish
    /// within the configured bound. The tasks are not cancelled; shutdown
    /// keeps proceeding in the background and its outcome is not guaranteed
    /// by the time the error is observed.
    pub async fn close(&self) -> Result<()> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        if let Some(shutdown_tx) = self.shutdown_tx.lock().take() {
            let _ = shutdown_tx.send(());
        }

        // Take the handles out of the mutex so the await below runs lock-free
        let handles: Vec<JoinHandle<()>> = mem::take(&mut *self.handles.lock());
        let task_count = handles.len();
        let drain = async {
            for handle in handles {
                let _ = handle.await;
            }
        };

        match tokio::time::timeout(self.shutdown_timeout, drain).await {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!(
                    task_count,
                    timeout = ?self.shutdown_timeout,
                    "shutdown did not complete in time; tasks still draining"
                );
                Err(Error::ShutdownTimeout(self.shutdown_timeout))
            }
        }
    }
}

impl<T> Drop for BatchProcessor<T> {
    fn drop(&mut self) {
        // Best-effort shutdown signal; the collector also treats the
        // submission channel closing as end-of-stream.
        self.closed.store(true, Ordering::SeqCst);
        if let Some(shutdown_tx) = self.shutdown_tx.lock().take() {
            let _ = shutdown_tx.send(());
        }
    }
}

/// Single task that turns the record stream into completed batches.
///
/// Reacts to four event sources: record arrival (size trigger), the flush
/// timer (time trigger), explicit flush requests, and the shutdown signal.
async fn run_collector<T>(
    mut record_rx: mpsc::Receiver<T>,
    mut flush_rx: mpsc::Receiver<()>,
    mut shutdown_rx: oneshot::Receiver<()>,
    batch_tx: mpsc::Sender<Vec<T>>,
    max_batch_size: usize,
    flush_interval: Duration,
) {
    let mut batch: Vec<T> = Vec::with_capacity(max_batch_size);
    let mut ticker = interval(flush_interval);
    ticker.tick().await; // skip the immediate first tick

    loop {
        tokio::select! {
            // Biased: drain waiting records before honoring a flush, tick, or
            // shutdown, so a flush request observes everything submitted
            // before it.
            biased;

            maybe_record = record_rx.recv() => match maybe_record {
                Some(record) => {
                    batch.push(record);
                    if batch.len() >= max_batch_size && !dispatch(&batch_tx, &mut batch).await {
                        break;
                    }
                }
                None => {
                    // Every submission handle is gone; same drain as shutdown
                    drain_and_finish(&mut record_rx, &batch_tx, &mut batch, max_batch_size).await;
                    break;
                }
            },
            maybe_flush = flush_rx.recv() => match maybe_flush {
                Some(()) => {
                    if !batch.is_empty() && !dispatch(&batch_tx, &mut batch).await {
                        break;
                    }
                }
                None => {
                    drain_and_finish(&mut record_rx, &batch_tx, &mut batch, max_batch_size).await;
                    break;
                }
            },
            _ = ticker.tick() => {
                if !batch.is_empty() && !dispatch(&batch_tx, &mut batch).await {
                    break;
                }
            }
            _ = &mut shutdown_rx => {
                drain_and_finish(&mut record_rx, &batch_tx, &mut batch, max_batch_size).await;
                break;
            }
        }
    }

    // Dropping batch_tx here closes the dispatch queue; workers drain what
    // remains and exit.
    debug!("collector exiting");
}

/// Hand a completed batch to the workers. Blocks when the dispatch queue is
/// full, throttling accumulation while senders lag. Returns false only when
/// the worker side is gone.
async fn dispatch<T>(batch_tx: &mpsc::Sender<Vec<T>>, batch: &mut Vec<T>) -> bool {
    if batch.is_empty() {
        return true;
    }
    if batch_tx.send(mem::take(batch)).await.is_err() {
        warn!("dispatch queue closed; dropping remaining records");
        return false;
    }
    true
}

/// Shutdown drain: fold everything already sitting in the submission queue
/// into batches without waiting for new arrivals, then flush the final
/// partial batch.
async fn drain_and_finish<T>(
    record_rx: &mut mpsc::Receiver<T>,
    batch_tx: &mpsc::Sender<Vec<T>>,
    batch: &mut Vec<T>,
    max_batch_size: usize,
) {
    while let Ok(record) = record_rx.try_recv() {
        batch.push(record);
        if batch.len() >= max_batch_size && !dispatch(batch_tx, batch).await {
            return;
        }
    }
    let _ = dispatch(batch_tx, batch).await;
}

/// Spawn the sender worker pool.
///
/// The workers share the single dispatch receiver behind a mutex; the lock
/// is held only across `recv()`, so taking batches is serialized while the
/// sends themselves run in parallel.
fn spawn_workers<T, S>(
    num_workers: usize,
    batch_rx: mpsc::Receiver<Vec<T>>,
    sender: Arc<S>,
) -> Vec<JoinHandle<()>>
where
    T: Send + 'static,
    S: BatchSender<T> + 'static,
{
    let batch_rx = Arc::new(tokio::sync::Mutex::new(batch_rx));
    (0..num_workers)
        .map(|worker_id| {
            let batch_rx = Arc::clone(&batch_rx);
            let sender = Arc::clone(&sender);
            tokio::spawn(run_worker(worker_id, batch_rx, sender))
        })
        .collect()
}

/// One sender worker: pull completed batches until the dispatch queue is
/// closed and empty, delivering each through the injected sender. Delivery
/// errors are logged and the batch is discarded; they never reach the
/// original submitters.
async fn run_worker<T, S>(
    worker_id: usize,
    batch_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Vec<T>>>>,
    sender: Arc<S>,
) where
    T: Send + 'static,
    S: BatchSender<T> + 'static,
{
    loop {
        let next = batch_rx.lock().await.recv().await;
        match next {
            Some(batch) => {
                if batch.is_empty() {
                    continue;
                }
                let batch_len = batch.len();
                if let Err(e) = sender.send_batch(batch).await {
                    error!(worker_id, batch_len, error = %e, "failed to deliver batch");
                }
            }
            None => break,
        }
    }
    debug!(worker_id, "sender worker exiting");
}
