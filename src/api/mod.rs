//! Access to the AppVeyor REST API.
//!
//! Everything upstream of the downloader talks to the API through the
//! [`CiApi`] trait: [`ApiClient`] implements it over HTTP, tests implement it
//! with canned replies.
//!
//! # Overview
//!
//! - [`client`] - HTTP implementation with error classification
//! - [`models`] - serde models of the replies this tool reads

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{ArtifactRecord, BuildDetail, BuildRecord, History, JobRecord, JobStatus};

use crate::error::Result;

use async_trait::async_trait;
use serde_json::Value;

/// Number of builds fetched from the project history.
pub const HISTORY_RECORDS: usize = 10;

/// Web UI root, used to point users at a failed job.
pub const WEB_PREFIX: &str = "https://ci.appveyor.com";

/// Something that answers API queries with parsed JSON.
#[async_trait]
pub trait CiApi: Send + Sync {
    /// Issues a GET for `endpoint` (a path under the API root, starting with
    /// `/`) and returns the parsed JSON body.
    async fn query(&self, endpoint: &str) -> Result<Value>;
}

/// Endpoint listing the most recent builds of a project, newest first.
pub fn history_endpoint(owner: &str, repo: &str) -> String {
    format!(
        "/projects/{}/{}/history?recordsNumber={}",
        owner, repo, HISTORY_RECORDS
    )
}

/// Endpoint describing one build and its jobs.
pub fn build_endpoint(owner: &str, repo: &str, version: &str) -> String {
    format!("/projects/{}/{}/build/{}", owner, repo, version)
}

/// Endpoint listing the artifacts of one job.
pub fn artifacts_endpoint(job_id: &str) -> String {
    format!("/buildjobs/{}/artifacts", job_id)
}

/// Download URL of one artifact.
pub fn artifact_url(api_url: &str, job_id: &str, file_name: &str) -> String {
    format!("{}/buildjobs/{}/artifacts/{}", api_url, job_id, file_name)
}

/// Web page of one job, shown when the job failed.
pub fn job_web_url(owner: &str, repo: &str, job_id: &str) -> String {
    format!(
        "{}/project/{}/{}/build/job/{}",
        WEB_PREFIX, owner, repo, job_id
    )
}
