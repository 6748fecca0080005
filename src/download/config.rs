//! Configuration structures and defaults for the downloader.

use crate::error::Result;
use crate::progress::DotProgress;

use reqwest_middleware::ClientWithMiddleware;
use std::env::current_dir;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Called with the local path of every file right after it is written.
///
/// An error stops the batch.
pub type CompletionCallback = Box<dyn Fn(&Path) -> Result<()> + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Client shared with the API queries. A default one is built when unset.
    pub client: Option<ClientWithMiddleware>,
    /// Root the progress labels are relative to.
    pub directory: PathBuf,
    /// Where the dot trail goes.
    pub progress: Arc<Mutex<DotProgress>>,
    /// Callback for when each download completes.
    pub on_complete: Option<Arc<CompletionCallback>>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("client", &self.client.is_some())
            .field("directory", &self.directory)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            client: None,
            directory: current_dir().unwrap_or_default(),
            progress: Arc::new(Mutex::new(DotProgress::stderr())),
            on_complete: None,
        }
    }
}
