use appveyor_artifacts::api::CiApi;
use appveyor_artifacts::{Config, Error, HttpClientConfig, Result};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// Common test constants
pub const OWNER: &str = "Robpol86";
pub const REPO: &str = "appveyor-artifacts";
pub const COMMIT: &str = "c4f19d2996ed1ab027b342dd0685157e3572679d";
pub const JOB_ID: &str = "abc1def2ghi3jkl4";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

// === Configuration Helpers ===

/// A valid configuration that polls every millisecond.
pub fn create_test_config() -> Config {
    Config {
        owner: OWNER.into(),
        repo: REPO.into(),
        commit: COMMIT.into(),
        sleep_for: Duration::from_millis(1),
        queue_attempts: 3,
        ..Config::default()
    }
}

/// HTTP settings with millisecond backoff and a short timeout.
pub fn create_test_http_config() -> HttpClientConfig {
    HttpClientConfig {
        attempts: 3,
        backoff: Duration::from_millis(10),
        timeout: Duration::from_millis(500),
        headers: None,
    }
}

// === Canned API ===

/// [`CiApi`] answering from per-endpoint reply queues.
///
/// Replies are handed out in order; the last one of a queue repeats forever.
#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<String, VecDeque<Value>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` for `endpoint`.
    pub fn reply(self, endpoint: impl Into<String>, reply: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint.into())
            .or_default()
            .push_back(reply);
        self
    }

    /// Endpoints queried so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| *c == endpoint).count()
    }
}

#[async_trait]
impl CiApi for FakeApi {
    async fn query(&self, endpoint: &str) -> Result<Value> {
        self.calls.lock().unwrap().push(endpoint.to_string());

        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(endpoint).ok_or_else(|| Error::Http {
            status: 404,
            message: format!("no reply for {}", endpoint),
        })?;
        let reply = if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        };
        Ok(reply)
    }
}

// === Reply Builders ===

pub fn history_endpoint() -> String {
    format!("/projects/{}/{}/history?recordsNumber=10", OWNER, REPO)
}

pub fn build_endpoint(version: &str) -> String {
    format!("/projects/{}/{}/build/{}", OWNER, REPO, version)
}

pub fn artifacts_endpoint(job_id: &str) -> String {
    format!("/buildjobs/{}/artifacts", job_id)
}

/// A history reply with one build per `(version, commit)` pair.
pub fn history_reply(builds: &[(&str, &str)]) -> Value {
    let builds: Vec<Value> = builds
        .iter()
        .map(|(version, commit)| {
            json!({
                "version": version,
                "commitId": commit,
                "branch": "master",
                "status": "success",
            })
        })
        .collect();
    json!({ "project": { "accountName": OWNER, "slug": REPO }, "builds": builds })
}

/// A build detail reply with one job per `(jobId, name, status)`.
pub fn jobs_reply(jobs: &[(&str, &str, &str)]) -> Value {
    let jobs: Vec<Value> = jobs
        .iter()
        .map(|(id, name, status)| json!({ "jobId": id, "name": name, "status": status }))
        .collect();
    json!({ "build": { "jobs": jobs } })
}

/// An artifact listing with one entry per `(fileName, size)`.
pub fn artifacts_reply(files: &[(&str, u64)]) -> Value {
    Value::Array(
        files
            .iter()
            .map(|(name, size)| json!({ "fileName": name, "size": size, "type": "File" }))
            .collect(),
    )
}

// === Output Capture ===

/// Clonable in-memory writer, for reading back what a sink received.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
