//! Core downloader implementation with fetch logic.
//!
//! Files are fetched one after the other, smallest first, each streamed to
//! disk in fixed-size chunks with one progress dot per chunk. The first
//! failure aborts the batch; files already written stay on disk.

use super::config::DownloaderConfig;
use super::summary::Summary;
use crate::artifacts::{Placement, Placements};
use crate::error::{Error, Result};
use crate::http::network_error;
use crate::progress::DotProgress;

use futures::StreamExt;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{MutexGuard, PoisonError};
use tokio::{fs, fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, error, info};

const MIN_CHUNK: u64 = 1024;
const MAX_CHUNK: u64 = 1024 * 1024;

/// Chunk size for a batch whose largest file is `max_size` bytes.
///
/// Aims for about fifty dots on the largest file, within 1 KiB and 1 MiB.
pub fn chunk_size_for(max_size: u64) -> usize {
    (max_size / 50).clamp(MIN_CHUNK, MAX_CHUNK) as usize
}

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main() -> Result<(), appveyor_artifacts::Error> {
/// use appveyor_artifacts::download::DownloaderBuilder;
///
/// let d = DownloaderBuilder::hidden().build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    client: ClientWithMiddleware,
    config: DownloaderConfig,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(client: ClientWithMiddleware, config: DownloaderConfig) -> Self {
        Self { client, config }
    }

    fn progress(&self) -> MutexGuard<'_, DotProgress> {
        self.config
            .progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn label(&self, local_path: &Path) -> String {
        local_path
            .strip_prefix(&self.config.directory)
            .unwrap_or(local_path)
            .display()
            .to_string()
    }

    /// Downloads every placement, smallest first, and returns what was written.
    ///
    /// All files share one chunk size computed from the largest of them.
    pub async fn download(&self, placements: &Placements) -> Result<Summary> {
        let largest = placements.values().map(|p| p.size).max().unwrap_or(0);
        let chunk_size = chunk_size_for(largest);

        let mut ordered: Vec<(&PathBuf, &Placement)> = placements.iter().collect();
        ordered.sort_by(|a, b| (a.1.size, a.0).cmp(&(b.1.size, b.0)));

        info!(
            "Downloading file{} (1 dot ~ {} KiB):",
            if placements.len() == 1 { "" } else { "s" },
            chunk_size / 1024
        );

        let mut summary = Summary::new();
        for (local_path, placement) in ordered {
            let size = self
                .download_file(local_path, &placement.url, placement.size, chunk_size)
                .await?;
            summary.record(local_path, size);

            if let Some(ref callback) = self.config.on_complete {
                callback(local_path)?;
            }
        }

        info!(
            "Downloaded {} file(s), {} bytes total.",
            summary.files().len(),
            summary.total_bytes()
        );
        Ok(summary)
    }

    /// Streams `url` into `local_path` and checks the result is `expected_size` bytes.
    ///
    /// `local_path` must not exist yet; that is checked before any request is
    /// made. A file of the wrong size is left on disk.
    pub async fn download_file(
        &self,
        local_path: &Path,
        url: &str,
        expected_size: u64,
        chunk_size: usize,
    ) -> Result<u64> {
        if local_path.exists() {
            error!("File already exists: {}", local_path.display());
            return Err(Error::FileExists(local_path.to_path_buf()));
        }
        let chunk_size = chunk_size.max(1);

        debug!("Fetching {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Err(network_error(url, e)),
        };

        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or_default().to_string();
            error!("HTTP {}: {}", status.as_u16(), message);
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(parent) = local_path.parent() {
            debug!("Creating destination directory {:?}", parent);
            fs::create_dir_all(parent).await?;
        }

        debug!("Creating destination file {:?}", local_path);
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(local_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                error!("File already exists: {}", local_path.display());
                return Err(Error::FileExists(local_path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        self.progress().start(&self.label(local_path))?;

        let mut written: u64 = 0;
        let mut pending: Vec<u8> = Vec::with_capacity(chunk_size);
        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let bytes = match item {
                Ok(bytes) => bytes,
                Err(e) => return Err(network_error(url, e.into())),
            };
            let mut rest = &bytes[..];
            while !rest.is_empty() {
                let take = (chunk_size - pending.len()).min(rest.len());
                pending.extend_from_slice(&rest[..take]);
                rest = &rest[take..];

                if pending.len() == chunk_size {
                    file.write_all(&pending).await?;
                    written += pending.len() as u64;
                    pending.clear();
                    self.progress().tick()?;
                }
            }
        }
        if !pending.is_empty() {
            file.write_all(&pending).await?;
            written += pending.len() as u64;
            self.progress().tick()?;
        }
        file.flush().await?;
        drop(file);

        self.progress().finish(written)?;

        if written != expected_size {
            error!(
                "Expected {} bytes but got {} bytes instead.",
                expected_size, written
            );
            return Err(Error::SizeMismatch {
                expected: expected_size,
                actual: written,
            });
        }

        Ok(written)
    }
}
