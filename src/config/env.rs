//! Defaults taken from the CI system this tool runs under.
//!
//! Detection reads from an explicit variable map rather than the process
//! environment so callers decide where the variables come from.

use std::collections::HashMap;

/// Identity of the current build as reported by the invoking CI system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    pub commit: String,
    pub owner: String,
    pub repo: String,
    pub tag: Option<String>,
    pub pull_request: Option<u64>,
}

impl CiEnvironment {
    /// Reads Travis CI variables when `TRAVIS=true`, empty defaults otherwise.
    pub fn detect(vars: &HashMap<String, String>) -> Self {
        if lookup(vars, "TRAVIS") != "true" {
            return Self::default();
        }

        let (owner, repo) = lookup(vars, "TRAVIS_REPO_SLUG")
            .split_once('/')
            .unwrap_or_default();

        Self {
            commit: lookup(vars, "TRAVIS_COMMIT").to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: Some(lookup(vars, "TRAVIS_TAG"))
                .filter(|t| !t.is_empty())
                .map(String::from),
            pull_request: lookup(vars, "TRAVIS_PULL_REQUEST").parse().ok(),
        }
    }

    /// Snapshot of the process environment.
    pub fn from_process() -> Self {
        Self::detect(&std::env::vars().collect())
    }
}

fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> &'a str {
    vars.get(key).map(String::as_str).unwrap_or_default()
}
