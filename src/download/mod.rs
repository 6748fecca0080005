//! Download module: streams resolved artifacts to disk.
//!
//! The module is organized into four components:
//!
//! - `downloader` - [`Downloader`] with the single-file and batch logic
//! - `builder` - [`DownloaderBuilder`] to configure a [`Downloader`]
//! - `config` - configuration and the per-file completion callback
//! - `summary` - [`Summary`] of a finished batch
//!
//! # Examples
//!
//! ```rust,no_run
//! use appveyor_artifacts::artifacts::{Placement, Placements};
//! use appveyor_artifacts::download::DownloaderBuilder;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut placements = Placements::new();
//! placements.insert(
//!     PathBuf::from("/tmp/out/README.md"),
//!     Placement {
//!         url: "https://ci.appveyor.com/api/buildjobs/abc1def2ghi3jkl4/artifacts/README.md".into(),
//!         size: 1234,
//!     },
//! );
//!
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("/tmp/out"))
//!     .build()?;
//! let summary = downloader.download(&placements).await?;
//! println!("{} bytes", summary.total_bytes());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub mod summary;

pub use builder::DownloaderBuilder;
pub use config::CompletionCallback;
pub use downloader::{chunk_size_for, Downloader};
pub use summary::Summary;
