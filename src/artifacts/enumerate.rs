//! Artifact Enumerator.

use crate::api::{artifact_url, artifacts_endpoint, models::parse_artifacts, CiApi};
use crate::error::Result;

use tracing::debug;

/// A file produced by a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub job_id: String,
    /// Remote file name, `/`-separated when the file sits in a subdirectory.
    pub file_name: String,
    pub size: u64,
}

impl Artifact {
    pub fn new(job_id: impl Into<String>, file_name: impl Into<String>, size: u64) -> Self {
        Self {
            job_id: job_id.into(),
            file_name: file_name.into(),
            size,
        }
    }

    /// Where the artifact is downloaded from.
    pub fn url(&self, api_url: &str) -> String {
        artifact_url(api_url, &self.job_id, &self.file_name)
    }
}

/// Lists the artifacts of every job, job by job, each job's files in the
/// order the API returns them.
pub async fn list_artifacts<A>(api: &A, job_ids: &[String]) -> Result<Vec<Artifact>>
where
    A: CiApi + ?Sized,
{
    let mut artifacts = Vec::new();
    for job_id in job_ids {
        let reply = api.query(&artifacts_endpoint(job_id)).await?;
        let records = parse_artifacts(reply)?;
        debug!("Job {} has {} artifact(s).", job_id, records.len());
        artifacts.extend(
            records
                .into_iter()
                .map(|r| Artifact::new(job_id.as_str(), r.file_name, r.size)),
        );
    }
    Ok(artifacts)
}
