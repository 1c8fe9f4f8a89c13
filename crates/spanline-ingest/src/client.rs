//! HTTP client that delivers event batches to an ingestion endpoint

use crate::error::{Error, Result};
use crate::event::IngestionEvent;
use async_trait::async_trait;
use serde::Serialize;
use spanline::BatchSender;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout (10 seconds).
///
/// The batch processor attaches no deadline to sends, so the HTTP client
/// bounds each request itself.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How much of an error response body to keep in the error message
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Serialize)]
struct IngestionPayload<'a> {
    batch: &'a [IngestionEvent],
}

/// HTTP ingestion client.
///
/// Posts batches of [`IngestionEvent`]s as `{"batch": [...]}` to a single
/// endpoint. Implements [`BatchSender`], so it plugs directly into a
/// [`BatchProcessor`](spanline::BatchProcessor).
///
/// # Example
///
/// ```rust,no_run
/// use spanline::BatchProcessor;
/// use spanline_ingest::IngestClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IngestClient::builder()
///     .endpoint("https://telemetry.example.com/api/ingestion")
///     .build()?;
/// let processor = BatchProcessor::new(client);
/// # Ok(())
/// # }
/// ```
pub struct IngestClient {
    endpoint: String,
    http: reqwest::Client,
}

impl IngestClient {
    /// Start building a client
    #[must_use]
    pub fn builder() -> IngestClientBuilder {
        IngestClientBuilder::default()
    }

    /// Deliver one batch of events to the ingestion endpoint.
    ///
    /// # Errors
    ///
    /// [`Error::Http`] on transport failure, [`Error::Backend`] when the
    /// backend returns a non-success status.
    pub async fn ingest(&self, events: &[IngestionEvent]) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&IngestionPayload { batch: events })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            // Byte-indexed truncate panics mid-codepoint; back down to a
            // char boundary first.
            let mut cut = ERROR_BODY_LIMIT.min(message.len());
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }

        debug!(batch_len = events.len(), "ingested batch");
        Ok(())
    }
}

#[async_trait]
impl BatchSender<IngestionEvent> for IngestClient {
    async fn send_batch(&self, batch: Vec<IngestionEvent>) -> spanline::Result<()> {
        self.ingest(&batch)
            .await
            .map_err(|e| spanline::Error::Delivery(e.to_string()))
    }
}

/// Builder for [`IngestClient`]
#[derive(Debug, Default)]
pub struct IngestClientBuilder {
    endpoint: Option<String>,
    request_timeout: Option<Duration>,
}

impl IngestClientBuilder {
    /// Set the ingestion endpoint URL (required)
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout (default 10s)
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if no endpoint was provided, [`Error::Http`]
    /// if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<IngestClient> {
        let endpoint = self
            .endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::Configuration("endpoint is required".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
            .build()?;

        Ok(IngestClient { endpoint, http })
    }
}
