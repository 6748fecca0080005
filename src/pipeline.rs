//! One run, start to finish: validate, wait for the build, list and place
//! its artifacts, download them, optionally mangle coverage files.

use crate::api::{ApiClient, CiApi};
use crate::artifacts::{list_artifacts, resolve_paths, Placements};
use crate::build::wait_for_build;
use crate::config::{validate, Config};
use crate::coverage::mangle_coverage;
use crate::download::{DownloaderBuilder, Summary};
use crate::error::Result;
use crate::http::{create_http_client, HttpClientConfig};
use crate::progress::DotProgress;

use tracing::{info, warn};

/// Waits for the build and maps every artifact to its local path.
pub async fn get_urls<A>(config: &Config, api: &A) -> Result<Placements>
where
    A: CiApi + ?Sized,
{
    let jobs = wait_for_build(config, api).await?;
    let job_ids: Vec<String> = jobs.into_iter().map(|job| job.id).collect();

    let artifacts = list_artifacts(api, &job_ids).await?;
    info!(
        "Found {} artifact{}.",
        artifacts.len(),
        if artifacts.len() == 1 { "" } else { "s" }
    );

    resolve_paths(config, &artifacts)
}

/// Runs the whole pipeline.
///
/// `http` configures the client shared by the API queries and the
/// downloads; the dot trail goes to `progress`.
pub async fn run(config: &Config, http: HttpClientConfig, progress: DotProgress) -> Result<Summary> {
    validate(config)?;

    let client = create_http_client(http.with_token(config.api_token.as_deref())?)?;
    let api = ApiClient::new(client.clone(), &config.api_url, config.api_token.as_deref());

    let placements = get_urls(config, &api).await?;
    if placements.is_empty() {
        warn!("No artifacts; nothing to download.");
        return Ok(Summary::new());
    }

    let mut builder = DownloaderBuilder::new()
        .client(client)
        .directory(config.root_dir()?)
        .progress(progress);
    if config.mangle_coverage {
        builder = builder.on_complete(mangle_coverage);
    }

    builder.build()?.download(&placements).await
}
