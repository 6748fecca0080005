//! Builder for [`Downloader`] instances.
//!
//! ```rust
//! use appveyor_artifacts::download::DownloaderBuilder;
//! use appveyor_artifacts::progress::DotProgress;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), appveyor_artifacts::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .progress(DotProgress::new(std::io::sink()))
//!     .on_complete(|path| {
//!         println!("wrote {}", path.display());
//!         Ok(())
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::error::Result;
use crate::http::{create_http_client, HttpClientConfig};
use crate::progress::DotProgress;

use reqwest_middleware::ClientWithMiddleware;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A builder used to create a [`Downloader`].
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Discards the dot trail.
    pub fn hidden() -> Self {
        DownloaderBuilder::default().progress(DotProgress::new(std::io::sink()))
    }

    /// Reuses an existing client instead of building one.
    pub fn client(mut self, client: ClientWithMiddleware) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Sets the directory progress labels are shown relative to.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Sets where the dot trail is written.
    pub fn progress(mut self, progress: DotProgress) -> Self {
        self.config.progress = Arc::new(Mutex::new(progress));
        self
    }

    /// Set callback for when each download completes.
    ///
    /// The callback runs after the file passed its size check and before the
    /// next download starts. Returning an error aborts the batch.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Path) -> Result<()> + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(mut self) -> Result<Downloader> {
        let client = match self.config.client.take() {
            Some(client) => client,
            None => create_http_client(HttpClientConfig::default())?,
        };
        Ok(Downloader::new(client, self.config))
    }
}
