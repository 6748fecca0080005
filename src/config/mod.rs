//! Run configuration.
//!
//! A [`Config`] is assembled once at startup (see [`crate::cli`]) from CI
//! environment defaults and command-line flags, checked with [`validate`],
//! and only read afterwards.
//!
//! # Examples
//!
//! ```rust
//! use appveyor_artifacts::config::{validate, Config, NoJobDirs};
//!
//! let config = Config {
//!     owner: "Robpol86".into(),
//!     repo: "appveyor-artifacts".into(),
//!     commit: "c4f19d2996ed1ab027b342dd0685157e3572679d".into(),
//!     no_job_dirs: Some(NoJobDirs::Rename),
//!     ..Config::default()
//! };
//! assert!(validate(&config).is_ok());
//! ```

pub mod env;

use crate::error::{Error, Result};

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::error;

pub use env::CiEnvironment;

/// Base URL of the AppVeyor REST API.
pub const API_PREFIX: &str = "https://ci.appveyor.com/api";

static REGEX_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z._-]+$").expect("valid name regex"));
static REGEX_COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{5,40}$").expect("valid commit regex"));

/// Collision policy used when job directories are turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoJobDirs {
    /// Keep both files, appending underscores to the later one's name.
    Rename,
    /// The later file replaces the earlier one.
    Overwrite,
    /// The earlier file wins, later ones are not downloaded.
    Skip,
}

impl NoJobDirs {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoJobDirs::Rename => "rename",
            NoJobDirs::Overwrite => "overwrite",
            NoJobDirs::Skip => "skip",
        }
    }
}

impl fmt::Display for NoJobDirs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoJobDirs {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rename" => Ok(NoJobDirs::Rename),
            "overwrite" => Ok(NoJobDirs::Overwrite),
            "skip" => Ok(NoJobDirs::Skip),
            _ => Err("--no-job-dirs has invalid value. Check --help for valid values.".into()),
        }
    }
}

/// Everything a run needs to know, fixed for the life of the process.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the API, without a trailing slash.
    pub api_url: String,
    /// Optional bearer token sent with every request.
    pub api_token: Option<String>,
    /// Repository owner (AppVeyor account name).
    pub owner: String,
    /// Repository (AppVeyor project slug).
    pub repo: String,
    /// Commit SHA being built. May be empty.
    pub commit: String,
    /// Tag that triggered the build.
    pub tag: Option<String>,
    /// Pull request number that triggered the build.
    pub pull_request: Option<u64>,
    /// Only consider the job with exactly this name.
    pub job_name: Option<String>,
    /// Download root. Defaults to the current directory.
    pub dir: Option<PathBuf>,
    /// Always place files under `<root>/<jobId>/`.
    pub always_job_dirs: bool,
    /// Never use job directories and resolve collisions with this policy.
    pub no_job_dirs: Option<NoJobDirs>,
    /// Rewrite Windows paths inside downloaded coverage files.
    pub mangle_coverage: bool,
    /// Exit 0 even when the run fails.
    pub ignore_errors: bool,
    /// Interval between two polls of the API.
    pub sleep_for: Duration,
    /// How many times to look for the build before giving up.
    pub queue_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: API_PREFIX.into(),
            api_token: None,
            owner: String::new(),
            repo: String::new(),
            commit: String::new(),
            tag: None,
            pull_request: None,
            job_name: None,
            dir: None,
            always_job_dirs: false,
            no_job_dirs: None,
            mangle_coverage: false,
            ignore_errors: false,
            sleep_for: Duration::from_secs(10),
            queue_attempts: 3,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|t| "*".repeat(t.len())))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("commit", &self.commit)
            .field("tag", &self.tag)
            .field("pull_request", &self.pull_request)
            .field("job_name", &self.job_name)
            .field("dir", &self.dir)
            .field("always_job_dirs", &self.always_job_dirs)
            .field("no_job_dirs", &self.no_job_dirs)
            .field("mangle_coverage", &self.mangle_coverage)
            .field("ignore_errors", &self.ignore_errors)
            .field("sleep_for", &self.sleep_for)
            .field("queue_attempts", &self.queue_attempts)
            .finish()
    }
}

impl Config {
    /// Directory downloads are placed under.
    pub fn root_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// The configured tag, if any and not empty.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|t| !t.is_empty())
    }

    /// The configured job name filter, if any and not empty.
    pub fn job_name(&self) -> Option<&str> {
        self.job_name.as_deref().filter(|n| !n.is_empty())
    }
}

fn invalid(message: String) -> Error {
    error!("{}", message);
    Error::InvalidConfig(message)
}

/// Checks a [`Config`] before anything touches the network.
pub fn validate(config: &Config) -> Result<()> {
    if !REGEX_NAME.is_match(&config.owner) {
        return Err(invalid("No or invalid repo owner name obtained.".into()));
    }
    if !REGEX_NAME.is_match(&config.repo) {
        return Err(invalid("No or invalid repo name obtained.".into()));
    }
    if config.always_job_dirs && config.no_job_dirs.is_some() {
        return Err(invalid(
            "Contradiction: --always-job-dirs and --no-job-dirs used.".into(),
        ));
    }
    if !config.commit.is_empty() && !REGEX_COMMIT.is_match(&config.commit) {
        return Err(invalid("No or invalid git commit obtained.".into()));
    }
    if let Some(dir) = &config.dir {
        if !dir.is_dir() {
            return Err(invalid(format!(
                "Not a directory or doesn't exist: {}",
                dir.display()
            )));
        }
    }
    if let Some(tag) = config.tag() {
        if !REGEX_NAME.is_match(tag) {
            return Err(invalid("Invalid git tag obtained.".into()));
        }
    }
    Ok(())
}
