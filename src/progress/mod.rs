//! Progress reporting for artifact downloads.
//!
//! Every file gets one line on the diagnostic stream: its path, one dot per
//! chunk written to disk, then its size. The trail goes to stderr so piped
//! stdout only carries log messages.
//!
//! # Examples
//!
//! ```rust
//! use appveyor_artifacts::progress::DotProgress;
//!
//! # fn example() -> std::io::Result<()> {
//! let mut progress = DotProgress::new(Vec::new());
//! progress.start("README.md")?;
//! progress.tick()?;
//! progress.tick()?;
//! progress.finish(1234)?;
//! # Ok(())
//! # }
//! ```

pub mod dots;

pub use dots::DotProgress;
