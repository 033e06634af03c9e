//! Resilient HTTP GET with timeout enforcement and exponential-backoff retry.
//!
//! [`FetchClient`] performs one logical request against a URL. Each attempt is
//! bounded by the configured timeout; 5xx and 429 responses, transport failures
//! and timeouts are retried with `retry_delay * 2^attempt` backoff. Any other
//! non-2xx status fails immediately.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub type TransportError = Box<dyn Error + Send + Sync>;
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>;

const USER_AGENT: &str = concat!("boj-mcp/", env!("CARGO_PKG_VERSION"));

/// Retry and timeout settings for a [`FetchClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Some(Duration::from_millis(30_000)),
        }
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets the per-attempt timeout. A zero duration disables enforcement.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { None } else { Some(timeout) };
        self
    }

    /// Delay before retrying after the zero-indexed `attempt` failed.
    #[must_use]
    pub const fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(2_u32.saturating_pow(attempt))
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw upstream response with the body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.status >= 500 || self.status == 429
    }
}

/// One GET against the upstream.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a>;
}

/// Adapts a closure into a [`Transport`], mostly for scripted upstreams.
pub struct FnTransport<F>(pub F);

impl<F> Transport for FnTransport<F>
where
    F: Fn(String) -> TransportFuture<'static> + Send + Sync,
{
    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
        (self.0)(url.to_string())
    }
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    /// Returns an error when the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| FetchError::Transport(Box::new(err)))?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, TransportError>(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        })
    }
}

#[derive(Debug)]
pub enum FetchError {
    Status { status: u16, status_text: String },
    Timeout(Duration),
    Transport(TransportError),
    Decode(serde_json::Error),
    InvalidUrl(String),
}

impl FetchError {
    fn from_response(response: &HttpResponse) -> Self {
        Self::Status {
            status: response.status,
            status_text: response.status_text.clone(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status {
                status,
                status_text,
            } => write!(f, "API request failed with status {status}: {status_text}"),
            Self::Timeout(timeout) => {
                write!(f, "Request timeout after {}ms", timeout.as_millis())
            }
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Decode(err) => write!(f, "unexpected response shape: {err}"),
            Self::InvalidUrl(message) => write!(f, "invalid request url: {message}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err.as_ref()),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

/// HTTP client that applies [`FetchOptions`] to every request.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    options: FetchOptions,
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchClient")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Creates a client on top of the default `reqwest` transport.
    ///
    /// # Errors
    /// Returns an error when the transport cannot be built.
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        Ok(Self::with_transport(Arc::new(ReqwestTransport::new()?), options))
    }

    #[must_use]
    pub const fn with_transport(transport: Arc<dyn Transport>, options: FetchOptions) -> Self {
        Self { transport, options }
    }

    #[must_use]
    pub const fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Performs one logical GET, retrying transient failures.
    ///
    /// # Errors
    /// Returns the terminal status error, or the last observed error once
    /// retries are exhausted.
    pub async fn fetch(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let max_retries = self.options.max_retries;
        // A received error response makes later transport failures in this call terminal.
        let mut received_error_response = false;
        let mut attempt = 0;

        loop {
            let error = match self.attempt(url).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) if !response.is_retryable() => {
                    debug!(url, status = response.status, "terminal upstream status");
                    return Err(FetchError::from_response(&response));
                }
                Ok(response) => {
                    received_error_response = true;
                    FetchError::from_response(&response)
                }
                Err(err) if received_error_response => return Err(err),
                Err(err) => err,
            };

            if attempt >= max_retries {
                warn!(url, attempts = attempt + 1, error = %error, "upstream retries exhausted");
                return Err(error);
            }

            let delay = self.options.backoff(attempt);
            debug!(url, attempt, delay = ?delay, error = %error, "retrying upstream request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Errors
    /// Returns any [`fetch`](Self::fetch) error, or [`FetchError::Decode`] when
    /// the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.fetch(url).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn attempt(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let request = self.transport.get(url);
        match self.options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, request)
                .await
                .map_err(|_| FetchError::Timeout(timeout))?
                .map_err(FetchError::Transport),
            None => request.await.map_err(FetchError::Transport),
        }
    }
}
