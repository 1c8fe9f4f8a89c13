//! Processor configuration

use std::time::Duration;

/// Default number of records accumulated before a batch is cut
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Default flush interval (3 seconds)
///
/// Bounds the worst-case latency between a record being accepted and its
/// batch being handed to a sender.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(3);

/// Default number of concurrent sender workers
pub const DEFAULT_NUM_WORKERS: usize = 1;

/// Default maximum wait for graceful shutdown (30 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Submission buffer capacity defaults to this many full batches
const BUFFER_BATCHES: usize = 10;

/// Configuration for a [`BatchProcessor`](crate::BatchProcessor)
///
/// Built with chainable `with_*` setters and resolved once at processor
/// construction; zero or unset values are replaced by defaults via
/// [`normalized`](Self::normalized). Never mutated after the processor
/// starts.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use spanline::BatchConfig;
///
/// let config = BatchConfig::new()
///     .with_max_batch_size(50)
///     .with_flush_interval(Duration::from_secs(1))
///     .with_num_workers(4);
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Size trigger: a batch is cut as soon as it reaches this many records
    pub max_batch_size: usize,

    /// Time trigger: any non-empty partial batch is cut on this cadence
    pub flush_interval: Duration,

    /// Submission queue capacity; `None` derives `max_batch_size * 10`
    pub buffer_size: Option<usize>,

    /// Number of concurrent sender workers.
    ///
    /// With more than one worker, batches may be delivered out of the order
    /// they were cut. Applications that need strict delivery order must keep
    /// the default single worker.
    pub num_workers: usize,

    /// Maximum wait for in-flight work during [`close`](crate::BatchProcessor::close)
    pub shutdown_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            buffer_size: None,
            num_workers: DEFAULT_NUM_WORKERS,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl BatchConfig {
    /// Create a configuration with all defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size trigger for cutting a batch
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Set the time trigger for cutting a partial batch
    #[must_use]
    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    /// Set the submission queue capacity
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    /// Set the number of concurrent sender workers.
    ///
    /// More than one worker parallelizes slow sends, but cross-batch
    /// delivery order is no longer guaranteed. Keep the default of 1 if the
    /// backend requires batches in the order they were cut.
    #[must_use]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Set the maximum wait for graceful shutdown
    #[must_use]
    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Replace zero or unset values with defaults.
    ///
    /// Called once when the processor starts, so the running tasks only ever
    /// see a fully resolved configuration.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.max_batch_size == 0 {
            self.max_batch_size = DEFAULT_MAX_BATCH_SIZE;
        }
        if self.flush_interval.is_zero() {
            self.flush_interval = DEFAULT_FLUSH_INTERVAL;
        }
        if self.num_workers == 0 {
            self.num_workers = DEFAULT_NUM_WORKERS;
        }
        if self.shutdown_timeout.is_zero() {
            self.shutdown_timeout = DEFAULT_SHUTDOWN_TIMEOUT;
        }
        match self.buffer_size {
            None | Some(0) => {
                self.buffer_size = Some(self.max_batch_size * BUFFER_BATCHES);
            }
            Some(_) => {}
        }
        self
    }

    /// Resolved submission queue capacity
    #[must_use]
    pub(crate) fn resolved_buffer_size(&self) -> usize {
        self.buffer_size
            .filter(|&size| size > 0)
            .unwrap_or(self.max_batch_size * BUFFER_BATCHES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::new();
        assert_eq!(config.max_batch_size, 100);
        assert_eq!(config.flush_interval, Duration::from_secs(3));
        assert_eq!(config.buffer_size, None);
        assert_eq!(config.num_workers, 1);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = BatchConfig::new()
            .with_max_batch_size(25)
            .with_flush_interval(Duration::from_millis(250))
            .with_buffer_size(64)
            .with_num_workers(4)
            .with_shutdown_timeout(Duration::from_secs(5));
        assert_eq!(config.max_batch_size, 25);
        assert_eq!(config.flush_interval, Duration::from_millis(250));
        assert_eq!(config.buffer_size, Some(64));
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_later_setter_wins() {
        let config = BatchConfig::new()
            .with_max_batch_size(10)
            .with_max_batch_size(20);
        assert_eq!(config.max_batch_size, 20);
    }

    #[test]
    fn test_normalized_replaces_zero_values() {
        let config = BatchConfig::new()
            .with_max_batch_size(0)
            .with_flush_interval(Duration::ZERO)
            .with_num_workers(0)
            .with_shutdown_timeout(Duration::ZERO)
            .normalized();
        assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
        assert_eq!(config.flush_interval, DEFAULT_FLUSH_INTERVAL);
        assert_eq!(config.num_workers, DEFAULT_NUM_WORKERS);
        assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
    }

    #[test]
    fn test_buffer_size_derived_from_batch_size() {
        let config = BatchConfig::new().with_max_batch_size(7).normalized();
        assert_eq!(config.buffer_size, Some(70));
        assert_eq!(config.resolved_buffer_size(), 70);
    }

    #[test]
    fn test_zero_buffer_size_falls_back_to_derived() {
        let config = BatchConfig::new()
            .with_max_batch_size(5)
            .with_buffer_size(0)
            .normalized();
        assert_eq!(config.buffer_size, Some(50));
    }

    #[test]
    fn test_explicit_buffer_size_kept() {
        let config = BatchConfig::new().with_buffer_size(2).normalized();
        assert_eq!(config.resolved_buffer_size(), 2);
    }
}
