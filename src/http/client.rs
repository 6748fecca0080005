//! HTTP client setup and middleware configuration.
//!
//! # Features
//!
//! - **Retry Logic**: a fixed-interval backoff policy, applied to connect
//!   failures and timeouts only (see [`NetworkTransient`])
//! - **Tracing**: request/response spans through `reqwest-tracing`
//! - **Timeouts**: connect and read timeouts, not a whole-request deadline, so
//!   large artifacts can stream for as long as bytes keep arriving
//! - **Default Headers**: JSON content type and the optional bearer token
//!
//! # Examples
//!
//! ```rust
//! use appveyor_artifacts::http::{create_http_client, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig {
//!     attempts: 5,
//!     backoff: Duration::from_millis(250),
//!     ..HttpClientConfig::default()
//! };
//!
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::http::retry::NetworkTransient;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;
use tracing::error;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total number of attempts per request, the first one included.
    pub attempts: u32,
    /// Fixed sleep between two attempts.
    pub backoff: Duration,
    /// Connect timeout, and read timeout between two received chunks.
    pub timeout: Duration,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
            headers: None,
        }
    }
}

impl HttpClientConfig {
    /// Sets the default headers every API request carries.
    ///
    /// The token is marked sensitive so it is masked wherever reqwest
    /// formats the header.
    pub fn with_token(mut self, token: Option<&str>) -> Result<Self> {
        let mut headers = self.headers.take().unwrap_or_default();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::InvalidConfig("API token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        self.headers = Some(headers);
        Ok(self)
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// This function sets up a reqwest client with:
/// - Tracing middleware for request/response logging
/// - Retry middleware for connect failures and timeouts
/// - Connect and read timeouts
/// - Optional default headers
pub fn create_http_client(config: HttpClientConfig) -> Result<ClientWithMiddleware> {
    // Fixed interval: both bounds are the configured backoff and jitter is off.
    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(config.backoff, config.backoff)
        .jitter(Jitter::None)
        .build_with_max_retries(config.attempts.saturating_sub(1));

    let mut inner_client_builder = reqwest::Client::builder()
        .connect_timeout(config.timeout)
        .read_timeout(config.timeout);

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        .with(TracingMiddleware::default())
        .with(RetryTransientMiddleware::new_with_policy_and_strategy(
            retry_policy,
            NetworkTransient,
        ))
        .build();

    Ok(client)
}

/// Whether the request ran out of time, looking through the retry
/// middleware's wrapping.
fn is_timeout(error: &reqwest_middleware::Error) -> bool {
    match error {
        reqwest_middleware::Error::Reqwest(e) => e.is_timeout(),
        reqwest_middleware::Error::Middleware(e) => e.chain().any(|cause| {
            cause
                .downcast_ref::<reqwest_middleware::Error>()
                .is_some_and(is_timeout)
                || cause
                    .downcast_ref::<reqwest::Error>()
                    .is_some_and(reqwest::Error::is_timeout)
                || cause
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|e| e.kind() == std::io::ErrorKind::TimedOut)
        }),
    }
}

/// Turns a request that never got a response into the matching [`Error`].
pub fn network_error(url: &str, source: reqwest_middleware::Error) -> Error {
    if is_timeout(&source) {
        error!("Timed out waiting for reply from server.");
        Error::Unresponsive {
            url: url.to_string(),
        }
    } else {
        error!("Unable to connect to server.");
        Error::Connection {
            url: url.to_string(),
            source,
        }
    }
}
