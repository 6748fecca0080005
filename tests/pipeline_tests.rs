//! End-to-end tests: a fake AppVeyor behind wiremock, real files on disk.

use appveyor_artifacts::artifacts::{list_artifacts, Artifact};
use appveyor_artifacts::pipeline::{get_urls, run};
use appveyor_artifacts::progress::DotProgress;
use appveyor_artifacts::{Config, Error};

use serde_json::json;
use std::path::PathBuf;
use tracing_test::traced_test;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::helpers::*;

async fn mount_build(server: &MockServer, files: &[(&str, usize)]) {
    Mock::given(method("GET"))
        .and(path(format!("/projects/{}/{}/history", OWNER, REPO)))
        .and(query_param("recordsNumber", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_reply(&[("1.0.7", COMMIT)])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/projects/{}/{}/build/1.0.7", OWNER, REPO)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(jobs_reply(&[(JOB_ID, "", "success")])),
        )
        .mount(server)
        .await;

    let listing: Vec<(&str, u64)> = files.iter().map(|(n, s)| (*n, *s as u64)).collect();
    Mock::given(method("GET"))
        .and(path(format!("/buildjobs/{}/artifacts", JOB_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(artifacts_reply(&listing)))
        .mount(server)
        .await;

    for (name, size) in files {
        Mock::given(method("GET"))
            .and(path(format!("/buildjobs/{}/artifacts/{}", JOB_ID, name)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'.'; *size]))
            .expect(1)
            .mount(server)
            .await;
    }
}

fn config_for(server: &MockServer, dir: PathBuf) -> Config {
    Config {
        api_url: server.uri(),
        api_token: Some("s3cr3t".into()),
        dir: Some(dir),
        ..create_test_config()
    }
}

#[tokio::test]
#[traced_test]
async fn test_run_downloads_everything() {
    let server = MockServer::start().await;
    mount_build(&server, &[("README.md", 1234), ("src/files/a.py", 3000)]).await;
    let temp_dir = create_temp_dir();
    let buffer = SharedBuffer::new();

    let summary = run(
        &config_for(&server, temp_dir.path().to_path_buf()),
        create_test_http_config(),
        DotProgress::new(buffer.clone()),
    )
    .await
    .unwrap();

    assert_eq!(summary.total_bytes(), 4234);
    assert_file_size(&temp_dir.path().join("README.md"), 1234);
    assert_file_size(&temp_dir.path().join("src/files/a.py"), 3000);
    assert_eq!(
        buffer.contents(),
        " => README.md .. 1234 bytes\n => src/files/a.py ... 3000 bytes\n"
    );
    assert!(logs_contain("Build successful. Found 1 job."));
    assert!(logs_contain("Found 2 artifacts."));
    assert!(logs_contain("Downloaded 2 file(s), 4234 bytes total."));
    assert!(!logs_contain("s3cr3t"));
}

#[tokio::test]
#[traced_test]
async fn test_run_with_mangle_skips_other_files() {
    let server = MockServer::start().await;
    mount_build(&server, &[(".coverage", 10)]).await;
    let temp_dir = create_temp_dir();

    let config = Config {
        mangle_coverage: true,
        ..config_for(&server, temp_dir.path().to_path_buf())
    };
    run(&config, create_test_http_config(), DotProgress::new(SharedBuffer::new()))
        .await
        .unwrap();

    let local = temp_dir.path().join(".coverage");
    assert_eq!(std::fs::read(&local).unwrap(), vec![b'.'; 10]);
    assert!(logs_contain(&format!("File {} not a coverage file.", local.display())));
}

#[tokio::test]
#[traced_test]
async fn test_run_without_artifacts() {
    let server = MockServer::start().await;
    mount_build(&server, &[]).await;
    let temp_dir = create_temp_dir();

    let summary = run(
        &config_for(&server, temp_dir.path().to_path_buf()),
        create_test_http_config(),
        DotProgress::new(SharedBuffer::new()),
    )
    .await
    .unwrap();

    assert!(summary.files().is_empty());
    assert!(logs_contain("Found 0 artifacts."));
    assert!(logs_contain("No artifacts; nothing to download."));
}

#[tokio::test]
async fn test_run_rejects_invalid_config_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = create_temp_dir();

    let config = Config {
        owner: "Inv@lid".into(),
        ..config_for(&server, temp_dir.path().to_path_buf())
    };
    let err = run(&config, create_test_http_config(), DotProgress::new(SharedBuffer::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[tokio::test]
async fn test_run_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history_reply(&[])))
        .expect(3)
        .mount(&server)
        .await;
    let temp_dir = create_temp_dir();

    let err = run(
        &config_for(&server, temp_dir.path().to_path_buf()),
        create_test_http_config(),
        DotProgress::new(SharedBuffer::new()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::BuildNotFound));
}

#[tokio::test]
#[traced_test]
async fn test_get_urls_two_jobs_with_conflicts() {
    let api = FakeApi::new()
        .reply(history_endpoint(), history_reply(&[("1.0.7", COMMIT)]))
        .reply(
            build_endpoint("1.0.7"),
            jobs_reply(&[
                ("v5wnn9k8auqcqovw", "py27", "success"),
                ("bpgcbvqmawv1jw06", "py34", "success"),
            ]),
        )
        .reply(
            artifacts_endpoint("v5wnn9k8auqcqovw"),
            artifacts_reply(&[(".coverage", 1692), ("luajit.exe", 675840)]),
        )
        .reply(
            artifacts_endpoint("bpgcbvqmawv1jw06"),
            artifacts_reply(&[(".coverage", 1700)]),
        );
    let config = Config {
        dir: Some(PathBuf::from("/out")),
        ..create_test_config()
    };

    let placements = get_urls(&config, &api).await.unwrap();

    let paths: Vec<PathBuf> = placements.keys().cloned().collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/out/bpgcbvqmawv1jw06/.coverage"),
            PathBuf::from("/out/v5wnn9k8auqcqovw/.coverage"),
            PathBuf::from("/out/v5wnn9k8auqcqovw/luajit.exe"),
        ]
    );
    assert_eq!(
        placements[&PathBuf::from("/out/bpgcbvqmawv1jw06/.coverage")].url,
        "https://ci.appveyor.com/api/buildjobs/bpgcbvqmawv1jw06/artifacts/.coverage"
    );
    assert!(logs_contain("Found 3 artifacts."));
}

#[tokio::test]
async fn test_list_artifacts_keeps_job_then_file_order() {
    let api = FakeApi::new()
        .reply(
            artifacts_endpoint("v5wnn9k8auqcqovw"),
            artifacts_reply(&[("luajit.exe", 675840), (".coverage", 1692), ("README.md", 1234)]),
        )
        .reply(
            artifacts_endpoint("bpgcbvqmawv1jw06"),
            artifacts_reply(&[("zz.txt", 1), ("aa.txt", 2)]),
        );
    let job_ids = vec!["v5wnn9k8auqcqovw".to_string(), "bpgcbvqmawv1jw06".to_string()];

    let artifacts = list_artifacts(&api, &job_ids).await.unwrap();

    assert_eq!(
        artifacts,
        vec![
            Artifact::new("v5wnn9k8auqcqovw", "luajit.exe", 675840),
            Artifact::new("v5wnn9k8auqcqovw", ".coverage", 1692),
            Artifact::new("v5wnn9k8auqcqovw", "README.md", 1234),
            Artifact::new("bpgcbvqmawv1jw06", "zz.txt", 1),
            Artifact::new("bpgcbvqmawv1jw06", "aa.txt", 2),
        ]
    );
    assert_eq!(
        api.calls(),
        vec![
            artifacts_endpoint("v5wnn9k8auqcqovw"),
            artifacts_endpoint("bpgcbvqmawv1jw06"),
        ]
    );
}
