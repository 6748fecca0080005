//! Wire models of the API replies.
//!
//! Keys the protocol requires but a reply may lack are `Option`s, so a
//! missing key can be reported by name instead of as a generic decoding
//! failure.

use crate::error::{Error, Result};

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::error;

/// Reply of the project history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    #[serde(default)]
    pub builds: Option<Vec<BuildRecord>>,
}

/// One build in the project history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    /// Opaque build version token, e.g. `1.0.239`.
    pub version: String,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Sent as a string by the API, accepted as a number too.
    #[serde(default)]
    pub pull_request_id: Option<Value>,
}

impl BuildRecord {
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    pub fn matches_pull_request(&self, pull_request: u64) -> bool {
        match &self.pull_request_id {
            Some(Value::String(id)) => id.trim().parse::<u64>().ok() == Some(pull_request),
            Some(Value::Number(id)) => id.as_u64() == Some(pull_request),
            _ => false,
        }
    }

    pub fn matches_commit(&self, commit: &str) -> bool {
        self.commit_id.as_deref() == Some(commit)
    }
}

/// Reply of the build detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildDetail {
    #[serde(default)]
    pub build: Option<BuildJobs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildJobs {
    #[serde(default)]
    pub jobs: Option<Vec<JobRecord>>,
}

/// One job of a build.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

/// One entry of a job's artifact listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub file_name: String,
    #[serde(default)]
    pub size: u64,
}

/// Status of a job as far as polling is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    Running,
    Success,
    Failed,
    /// Anything else the API may report, kept verbatim.
    Unknown(String),
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "queued" => JobStatus::Queued,
            "running" => JobStatus::Running,
            "success" => JobStatus::Success,
            "failed" => JobStatus::Failed,
            other => JobStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Running => f.write_str("running"),
            JobStatus::Success => f.write_str("success"),
            JobStatus::Failed => f.write_str("failed"),
            JobStatus::Unknown(s) => f.write_str(s),
        }
    }
}

fn malformed(message: String) -> Error {
    error!("Bad JSON reply: {}", message);
    Error::MalformedResponse(message)
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

/// Extracts the build list of a history reply.
pub fn parse_history(value: Value) -> Result<Vec<BuildRecord>> {
    decode::<History>(value)?
        .builds
        .ok_or_else(|| malformed("\"builds\" key missing.".into()))
}

/// Extracts the job list of a build detail reply.
pub fn parse_build_jobs(value: Value) -> Result<Vec<JobRecord>> {
    decode::<BuildDetail>(value)?
        .build
        .ok_or_else(|| malformed("\"build\" key missing.".into()))?
        .jobs
        .ok_or_else(|| malformed("\"jobs\" key missing.".into()))
}

/// Decodes an artifact listing reply.
pub fn parse_artifacts(value: Value) -> Result<Vec<ArtifactRecord>> {
    decode(value)
}
