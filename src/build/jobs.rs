//! Job listing of a build version.

use crate::api::{build_endpoint, models::parse_build_jobs, CiApi, JobStatus};
use crate::config::Config;
use crate::error::{Error, Result};

use tracing::{debug, error};

/// A job of the build being waited on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
}

impl Job {
    pub fn new(id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }
}

/// Lists the jobs of build `version` with their current status, in the
/// order the API returns them.
///
/// With a job name filter configured only the job carrying exactly that name
/// is returned; not finding it is an error.
pub async fn resolve_jobs<A>(version: &str, config: &Config, api: &A) -> Result<Vec<Job>>
where
    A: CiApi + ?Sized,
{
    let reply = api
        .query(&build_endpoint(&config.owner, &config.repo, version))
        .await?;
    let jobs = parse_build_jobs(reply)?;

    let Some(job_name) = config.job_name() else {
        return Ok(jobs
            .into_iter()
            .map(|job| Job::new(job.job_id, JobStatus::from(job.status.as_str())))
            .collect());
    };

    match jobs.into_iter().find(|job| job.name == job_name) {
        Some(job) => {
            debug!("Filtering by job name: found match!");
            Ok(vec![Job::new(job.job_id, JobStatus::from(job.status.as_str()))])
        }
        None => {
            error!("Job name \"{}\" not found.", job_name);
            Err(Error::JobNameNotFound(job_name.to_string()))
        }
    }
}
