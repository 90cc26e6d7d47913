//! Bounded-retry JSON fetcher.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::EndpointConfig;
use crate::error::{FetchError, TransportError};
use crate::logger::SharedLog;

/// Where the polling loop gets raw readings from.
#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Fetch one raw reading, retrying within the source's own budget.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// HTTP GET against the configured endpoint, retried up to `max_tries` times.
pub struct ReadingFetcher {
    client: reqwest::Client,
    endpoint: EndpointConfig,
    log: SharedLog,
}

impl ReadingFetcher {
    pub fn new(endpoint: EndpointConfig, log: SharedLog) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            endpoint,
            log,
        })
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Fetch the endpoint's JSON, retrying transport failures.
    ///
    /// Returns the first body that is valid JSON, whatever its HTTP status;
    /// a JSON error document is left for the parser to reject. After
    /// `max_tries` failed attempts (at least one is always made) fails with
    /// [`FetchError::RetriesExceeded`]. Failed attempts are separated by
    /// `retry_wait`.
    pub async fn fetch_with_retry(&self) -> Result<Value, FetchError> {
        let max_tries = self.endpoint.max_tries.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    self.log.info(&format!(
                        "Failed attempt {attempt} of {max_tries} to get json data: {e}"
                    ));
                    if attempt >= max_tries {
                        self.log.error(&format!(
                            "Max retries ({max_tries}) exceeded for readings"
                        ));
                        return Err(FetchError::RetriesExceeded {
                            attempts: max_tries,
                            last: e,
                        });
                    }
                }
            }
            if !self.endpoint.retry_wait.is_zero() {
                tokio::time::sleep(self.endpoint.retry_wait).await;
            }
            attempt += 1;
        }
    }

    async fn attempt(&self) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(&self.endpoint.url)
            .timeout(self.endpoint.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice(&body) {
            Ok(value) => {
                if !status.is_success() {
                    self.log.debug(&format!(
                        "HTTP status {} with JSON body, passing it on",
                        status.as_u16()
                    ));
                }
                Ok(value)
            }
            Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ReadingSource for ReadingFetcher {
    async fn fetch(&self) -> Result<Value, FetchError> {
        self.fetch_with_retry().await
    }
}
