//! Retry classification for the HTTP middleware.

use reqwest_middleware::Error;
use reqwest_retry::{Retryable, RetryableStrategy};

/// Retries connect failures and timeouts, nothing else.
///
/// Any response that made it back from the server, whatever its status, is
/// handed to the caller untouched: an HTTP 500 from the API is an answer,
/// not a transient network condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkTransient;

impl RetryableStrategy for NetworkTransient {
    fn handle(&self, res: &Result<reqwest::Response, Error>) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(Error::Reqwest(error)) if error.is_connect() || error.is_timeout() => {
                Some(Retryable::Transient)
            }
            Err(_) => Some(Retryable::Fatal),
        }
    }
}
