//! HTTP implementation of [`CiApi`].

use super::CiApi;
use crate::error::{Error, Result};
use crate::http::network_error;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use std::fmt;
use tracing::{debug, error};

/// Longest slice of an unexpected body echoed into the error.
const BODY_PREVIEW: usize = 512;

/// Queries the API over HTTP.
#[derive(Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|t| redact(t, t)))
            .finish()
    }
}

impl ApiClient {
    /// Wraps an existing client, which must already carry the default
    /// headers (see [`HttpClientConfig::with_token`]).
    pub fn new(client: ClientWithMiddleware, base_url: &str, token: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Printable description of the request headers, token masked.
    fn safe_headers(&self) -> String {
        let mut headers = String::from("{'content-type': 'application/json'");
        if let Some(token) = &self.token {
            headers.push_str(&format!(", 'authorization': 'Bearer {}'", token));
        }
        headers.push('}');
        match &self.token {
            Some(token) => redact(&headers, token),
            None => headers,
        }
    }
}

/// Replaces every occurrence of `secret` in `text` with asterisks.
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, &"*".repeat(secret.len()))
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait]
impl CiApi for ApiClient {
    async fn query(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Querying {} with headers {}.", url, self.safe_headers());

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Err(network_error(&url, e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Err(network_error(&url, e.into())),
        };

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from));
            let message = match message {
                Some(message) => message,
                None => {
                    debug!("Response body: {}", body);
                    preview(&body)
                }
            };
            error!("HTTP {}: {}", status.as_u16(), message);
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) => {
                error!("Failed to parse JSON: {}", preview(&body));
                Err(Error::InvalidJson { body })
            }
        }
    }
}
