//! Artifacts of a finished build and where they land on disk.
//!
//! - [`enumerate`] - flat listing of every job's artifacts
//! - [`paths`] - deterministic, collision-free local destinations
//!
//! # Examples
//!
//! ```rust
//! use appveyor_artifacts::artifacts::{resolve_paths, Artifact};
//! use appveyor_artifacts::config::Config;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     dir: Some(PathBuf::from("/tmp/out")),
//!     ..Config::default()
//! };
//! let artifacts = vec![Artifact::new("spfxkimxcj6faq57", ".coverage", 1692)];
//!
//! let placements = resolve_paths(&config, &artifacts)?;
//! assert!(placements.contains_key(&PathBuf::from("/tmp/out/.coverage")));
//! # Ok(())
//! # }
//! ```

pub mod enumerate;
pub mod paths;

pub use enumerate::{list_artifacts, Artifact};
pub use paths::{resolve_paths, Placement, Placements};
