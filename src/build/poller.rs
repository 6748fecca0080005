//! Polling loop: wait for the build to be queued, then for its jobs to finish.

use super::jobs::{resolve_jobs, Job};
use super::resolver::resolve_build_version;
use crate::api::{job_web_url, CiApi, JobStatus};
use crate::config::Config;
use crate::error::{Error, Result};

use std::collections::BTreeSet;
use tokio::time::sleep;
use tracing::{error, info};

/// What one poll of the job statuses says about the build.
#[derive(Debug, PartialEq, Eq)]
pub enum Progress<'a> {
    /// At least one job failed.
    Failed(&'a Job),
    /// Every job succeeded.
    Succeeded,
    /// At least one job is running.
    Running,
    /// Nothing is running yet but at least one job is queued.
    Queued,
    /// Statuses that are none of the above.
    Unknown(Vec<String>),
}

/// Folds the statuses of a poll into a single verdict.
pub fn assess(jobs: &[Job]) -> Progress<'_> {
    if let Some(job) = jobs.iter().find(|j| j.status == JobStatus::Failed) {
        return Progress::Failed(job);
    }
    if jobs.iter().all(|j| j.status == JobStatus::Success) {
        return Progress::Succeeded;
    }
    if jobs.iter().any(|j| j.status == JobStatus::Running) {
        return Progress::Running;
    }
    if jobs.iter().any(|j| j.status == JobStatus::Queued) {
        return Progress::Queued;
    }

    let unknown: BTreeSet<String> = jobs
        .iter()
        .filter_map(|j| match &j.status {
            JobStatus::Unknown(status) => Some(status.clone()),
            _ => None,
        })
        .collect();
    Progress::Unknown(unknown.into_iter().collect())
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Polls the history until the configured build shows up.
async fn wait_for_version<A>(config: &Config, api: &A) -> Result<String>
where
    A: CiApi + ?Sized,
{
    for attempt in 1..=config.queue_attempts {
        if let Some(version) = resolve_build_version(config, api).await? {
            return Ok(version);
        }
        info!("Waiting for job to be queued...");
        if attempt < config.queue_attempts {
            sleep(config.sleep_for).await;
        }
    }

    error!("Timed out waiting for job to be queued or build not found.");
    Err(Error::BuildNotFound)
}

/// Waits until every job of the configured build succeeded and returns them.
///
/// Finding the build is bounded by [`Config::queue_attempts`]; once found,
/// jobs are polled every [`Config::sleep_for`] for as long as they are queued
/// or running. A failed job or a status this loop does not understand ends
/// the wait with an error.
pub async fn wait_for_build<A>(config: &Config, api: &A) -> Result<Vec<Job>>
where
    A: CiApi + ?Sized,
{
    let version = wait_for_version(config, api).await?;

    loop {
        let jobs = resolve_jobs(&version, config, api).await?;

        match assess(&jobs) {
            Progress::Failed(job) => {
                let url = job_web_url(&config.owner, &config.repo, &job.id);
                error!("AppVeyor job failed: {}", url);
                return Err(Error::JobFailed { url });
            }
            Progress::Succeeded => {
                info!(
                    "Build successful. Found {} job{}.",
                    jobs.len(),
                    plural(jobs.len())
                );
                return Ok(jobs);
            }
            Progress::Running => {
                info!("Waiting for job{} to finish...", plural(jobs.len()));
            }
            Progress::Queued => info!("Waiting for all jobs to start..."),
            Progress::Unknown(statuses) => {
                error!("Got unknown status from AppVeyor API: {}", statuses.join(" "));
                return Err(Error::UnknownStatus(statuses));
            }
        }

        sleep(config.sleep_for).await;
    }
}
