//! Wait for an AppVeyor build to finish, then download its artifacts.
//!
//! Meant to run from another CI system (Travis CI, typically) building the
//! same commit, tag or pull request: the AppVeyor build is located in the
//! project history, its jobs are polled until they all succeeded, and every
//! artifact they published is streamed to a local directory. Coverage data
//! recorded on Windows can be rewritten to local paths so both runs' reports
//! can be combined.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use appveyor_artifacts::{pipeline, progress::DotProgress, Config, HttpClientConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), appveyor_artifacts::Error> {
//! let config = Config {
//!     owner: "Robpol86".into(),
//!     repo: "appveyor-artifacts".into(),
//!     commit: "c4f19d2996ed1ab027b342dd0685157e3572679d".into(),
//!     ..Config::default()
//! };
//! let summary = pipeline::run(&config, HttpClientConfig::default(), DotProgress::stderr()).await?;
//! println!("{} files", summary.files().len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`config`] - Run configuration, validation and CI environment defaults
//! - [`api`] - The `CiApi` trait, its HTTP client and the wire models
//! - [`build`] - Build resolution and job polling
//! - [`artifacts`] - Artifact listing and local path resolution
//! - [`download`] - Streaming downloads with the dot-trail progress
//! - [`coverage`] - Rewriting of Windows paths in coverage files
//! - [`pipeline`] - All of the above in order
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client construction
//! - [`progress`] - Dot-trail progress output
//! - [`cli`] and [`logging`] - Binary support

pub mod api;
pub mod artifacts;
pub mod build;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod download;
pub mod error;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod progress;

pub use api::{ApiClient, CiApi};
pub use artifacts::{Artifact, Placement, Placements};
pub use config::{validate, Config, NoJobDirs};
pub use download::{Downloader, DownloaderBuilder, Summary};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
