//! HTTP module containing HTTP client functionality.
//!
//! This module builds the single reqwest client a run uses, for both the API
//! queries and the artifact downloads. The client carries the default headers
//! (JSON content type, optional bearer token), connect and read timeouts,
//! request tracing, and a retry middleware that only retries network-level
//! failures.
//!
//! # Overview
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`retry`] - Classification of which failures are worth another attempt
//!
//! # Examples
//!
//! ```rust
//! use appveyor_artifacts::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig::default().with_token(Some("s3cr3t"))?;
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod retry;

pub use client::{create_http_client, network_error, HttpClientConfig};
pub use retry::NetworkTransient;
