//! Outcome of a download batch.

use std::path::{Path, PathBuf};

/// Files written by a batch, in download order, and their combined size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    files: Vec<PathBuf>,
    total_bytes: u64,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one file written to disk.
    pub fn record(&mut self, path: &Path, size: u64) {
        self.files.push(path.to_path_buf());
        self.total_bytes += size;
    }

    /// Paths written, in download order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
