//! Command line of the `appveyor-artifacts` binary.
//!
//! Options are global so they can come before or after the `download`
//! subcommand. Anything not given on the command line falls back to the CI
//! environment (see [`CiEnvironment`]).

use crate::config::{CiEnvironment, Config, NoJobDirs};
use crate::error::Result;

use clap::{Parser, Subcommand};
use std::error::Error as _;
use std::path::PathBuf;
use tracing::error;

/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "APPVEYOR_API_TOKEN";

/// Download artifacts from AppVeyor builds of the same commit/pull request.
#[derive(Debug, Parser)]
#[command(name = "appveyor-artifacts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Download to this directory instead of the current one
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Git commit currently building
    #[arg(short = 'c', long, global = true)]
    pub commit: Option<String>,

    /// Repository owner/account name
    #[arg(short = 'o', long = "owner-name", global = true, value_name = "NAME")]
    pub owner_name: Option<String>,

    /// Repository name
    #[arg(short = 'n', long = "repo-name", global = true, value_name = "NAME")]
    pub repo_name: Option<String>,

    /// Tag name that triggered the build
    #[arg(short = 't', long = "tag-name", global = true, value_name = "NAME")]
    pub tag_name: Option<String>,

    /// Pull request number of the current job
    #[arg(short = 'p', long = "pull-request", global = true, value_name = "NUMBER")]
    pub pull_request: Option<u64>,

    /// Filter by job name (Python versions, etc)
    #[arg(short = 'N', long = "job-name", global = true, value_name = "NAME")]
    pub job_name: Option<String>,

    /// Always download files into <jobId>/ subdirectories
    #[arg(short = 'j', long, global = true)]
    pub always_job_dirs: bool,

    /// Never use job directories; on collision rename, overwrite or skip
    #[arg(short = 'J', long, global = true, value_name = "KEYWORD")]
    pub no_job_dirs: Option<NoJobDirs>,

    /// Rewrite Windows paths in downloaded .coverage files to local ones
    #[arg(short = 'm', long, global = true)]
    pub mangle_coverage: bool,

    /// Exit 0 when something goes wrong
    #[arg(short = 'i', long, global = true)]
    pub ignore_errors: bool,

    /// Report the full error chain on failure
    #[arg(short = 'r', long, global = true)]
    pub raise: bool,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Download build artifacts to the local directory
    Download,
}

impl Cli {
    /// Flags win over the CI environment; an empty token counts as none.
    pub fn to_config(&self, env: &CiEnvironment, token: Option<String>) -> Config {
        Config {
            api_token: token.filter(|t| !t.is_empty()),
            owner: self.owner_name.clone().unwrap_or_else(|| env.owner.clone()),
            repo: self.repo_name.clone().unwrap_or_else(|| env.repo.clone()),
            commit: self.commit.clone().unwrap_or_else(|| env.commit.clone()),
            tag: self.tag_name.clone().or_else(|| env.tag.clone()),
            pull_request: self.pull_request.or(env.pull_request),
            job_name: self.job_name.clone(),
            dir: self.dir.clone(),
            always_job_dirs: self.always_job_dirs,
            no_job_dirs: self.no_job_dirs,
            mangle_coverage: self.mangle_coverage,
            ignore_errors: self.ignore_errors,
            ..Config::default()
        }
    }
}

/// Reports how a run ended and picks the process exit status.
///
/// Failures log `Failure.`; with `raise` the error and its sources are
/// logged first and the status is 1 even under `ignore_errors`.
pub fn exit_status<T>(result: &Result<T>, raise: bool, ignore_errors: bool) -> u8 {
    let Err(e) = result else {
        return 0;
    };

    if raise {
        error!("{:?}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("Caused by: {}", cause);
            source = cause.source();
        }
    }
    error!("Failure.");

    if ignore_errors && !raise {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::CommandFactory;
    use std::io;
    use tracing_test::traced_test;

    fn failed() -> Result<()> {
        Err(Error::from(io::Error::other("disk full")))
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_before_and_after_subcommand() {
        let before = Cli::try_parse_from([
            "appveyor-artifacts",
            "-o",
            "me",
            "-n",
            "project",
            "-J",
            "skip",
            "download",
        ])
        .unwrap();
        let after = Cli::try_parse_from([
            "appveyor-artifacts",
            "download",
            "--owner-name",
            "me",
            "--repo-name",
            "project",
            "--no-job-dirs",
            "skip",
        ])
        .unwrap();

        for cli in [before, after] {
            assert_eq!(cli.command, Command::Download);
            assert_eq!(cli.owner_name.as_deref(), Some("me"));
            assert_eq!(cli.repo_name.as_deref(), Some("project"));
            assert_eq!(cli.no_job_dirs, Some(NoJobDirs::Skip));
        }
    }

    #[test]
    fn test_invalid_no_job_dirs() {
        let err = Cli::try_parse_from(["appveyor-artifacts", "download", "-J", "nope"]).unwrap_err();
        assert!(err.to_string().contains("--no-job-dirs has invalid value"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["appveyor-artifacts", "-o", "me"]).is_err());
    }

    #[test]
    fn test_flags_override_environment() {
        let env = CiEnvironment {
            commit: "abc1234".into(),
            owner: "travis-owner".into(),
            repo: "travis-repo".into(),
            tag: None,
            pull_request: Some(7),
        };
        let cli = Cli::try_parse_from([
            "appveyor-artifacts",
            "download",
            "-n",
            "mine",
            "-p",
            "12",
            "-mi",
        ])
        .unwrap();

        let config = cli.to_config(&env, Some(String::new()));
        assert_eq!(config.owner, "travis-owner");
        assert_eq!(config.repo, "mine");
        assert_eq!(config.commit, "abc1234");
        assert_eq!(config.pull_request, Some(12));
        assert!(config.mangle_coverage);
        assert!(config.ignore_errors);
        assert_eq!(config.api_token, None);
    }

    #[test]
    #[traced_test]
    fn test_exit_status_success() {
        for (raise, ignore_errors) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(exit_status(&Ok(()), raise, ignore_errors), 0);
        }
        assert!(!logs_contain("Failure."));
    }

    #[test]
    #[traced_test]
    fn test_exit_status_failure() {
        assert_eq!(exit_status(&failed(), false, false), 1);
        assert!(logs_contain("Failure."));
        assert!(!logs_contain("Caused by:"));
    }

    #[test]
    #[traced_test]
    fn test_exit_status_ignore_errors() {
        assert_eq!(exit_status(&failed(), false, true), 0);
        assert!(logs_contain("Failure."));
    }

    #[test]
    #[traced_test]
    fn test_exit_status_raise() {
        assert_eq!(exit_status(&failed(), true, false), 1);
        assert!(logs_contain("Caused by: disk full"));
        assert!(logs_contain("Failure."));
    }

    #[test]
    #[traced_test]
    fn test_exit_status_raise_wins_over_ignore_errors() {
        assert_eq!(exit_status(&failed(), true, true), 1);
        assert!(logs_contain("Caused by: disk full"));
    }
}
