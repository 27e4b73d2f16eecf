use crate::error::FetchError;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for a whole request, body included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Time limits applied to every request of an [`HttpFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: REQUEST_TIMEOUT,
            connect: CONNECT_TIMEOUT,
        }
    }
}

/// Get standard user agent string
pub fn get_user_agent() -> &'static str {
    "spike-fetch"
}

/// Status code and raw body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Performs a single logical GET. Implementations may retry internally.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError>;
}

/// Statuses worth asking again for: throttling and server-side failures
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Bounded retry with capped exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that issues every request exactly once
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Doubles per attempt, adds up to 25% jitter, never exceeds `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1 << exponent);
        let jitter_ms = (backoff.as_millis() / 4) as u64;
        let jitter = Duration::from_millis(rand::rng().random_range(0..=jitter_ms));
        (backoff + jitter).min(self.max_delay)
    }
}

/// [`Fetcher`] backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_retry(RetryPolicy::default())
    }

    pub fn with_retry(retry: RetryPolicy) -> Result<Self, FetchError> {
        Self::from_builder(reqwest::Client::builder(), retry, Timeouts::default())
    }

    /// Apply the user agent and `timeouts` on top of `builder`.
    pub fn from_builder(
        builder: reqwest::ClientBuilder,
        retry: RetryPolicy,
        timeouts: Timeouts,
    ) -> Result<Self, FetchError> {
        let client = builder
            .user_agent(get_user_agent())
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()?;

        Ok(Self { client, retry })
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(FetchedResponse::new(status, body))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Retries transport errors and retryable statuses. Once attempts run
    /// out, the last response (or error) is returned as is.
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let mut attempt = 1;

        loop {
            let more_attempts = attempt < self.retry.max_attempts;

            match self.fetch_once(url).await {
                Ok(response) if more_attempts && is_retryable_status(response.status) => {
                    warn!(
                        "GET {} returned {} (attempt {}/{}), retrying",
                        url, response.status, attempt, self.retry.max_attempts
                    );
                }
                Ok(response) => {
                    debug!("GET {} -> {}", url, response.status);
                    return Ok(response);
                }
                Err(e) if more_attempts && e.is_transient() => {
                    warn!(
                        "GET {} failed (attempt {}/{}): {}, retrying",
                        url, attempt, self.retry.max_attempts, e
                    );
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.retry.delay_for(attempt)).await;
            attempt += 1;
        }
    }
}
