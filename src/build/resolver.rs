//! Build Resolver.

use crate::api::{history_endpoint, models::parse_history, CiApi};
use crate::config::Config;
use crate::error::Result;

use tracing::debug;

/// Which piece of the configured identity selects the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identity<'a> {
    Tag(&'a str),
    PullRequest(u64),
    Commit(&'a str),
}

impl<'a> Identity<'a> {
    /// The highest-priority identity with a configured value.
    fn of(config: &'a Config) -> Option<Self> {
        if let Some(tag) = config.tag() {
            Some(Identity::Tag(tag))
        } else if let Some(pull_request) = config.pull_request {
            Some(Identity::PullRequest(pull_request))
        } else if !config.commit.is_empty() {
            Some(Identity::Commit(&config.commit))
        } else {
            None
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Identity::Tag(_) => "tag",
            Identity::PullRequest(_) => "pull request",
            Identity::Commit(_) => "branch",
        }
    }
}

/// Looks for the build matching the configured identity among the most
/// recent builds of the project.
///
/// Only the highest-priority configured identity is compared (tag, then pull
/// request, then commit) and the first build in history order that matches
/// it wins. `Ok(None)` means the build is not queued yet.
pub async fn resolve_build_version<A>(config: &Config, api: &A) -> Result<Option<String>>
where
    A: CiApi + ?Sized,
{
    let reply = api
        .query(&history_endpoint(&config.owner, &config.repo))
        .await?;
    let builds = parse_history(reply)?;

    let Some(identity) = Identity::of(config) else {
        debug!("No tag, pull request or commit configured.");
        return Ok(None);
    };

    let found = builds.into_iter().find(|build| match identity {
        Identity::Tag(tag) => build.matches_tag(tag),
        Identity::PullRequest(pull_request) => build.matches_pull_request(pull_request),
        Identity::Commit(commit) => build.matches_commit(commit),
    });

    Ok(found.map(|build| {
        debug!("This is a {} build.", identity.kind());
        build.version
    }))
}
