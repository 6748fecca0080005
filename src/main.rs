use appveyor_artifacts::cli::{exit_status, Cli, TOKEN_VAR};
use appveyor_artifacts::config::CiEnvironment;
use appveyor_artifacts::logging::init_logging;
use appveyor_artifacts::pipeline;
use appveyor_artifacts::progress::DotProgress;
use appveyor_artifacts::HttpClientConfig;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.to_config(&CiEnvironment::from_process(), std::env::var(TOKEN_VAR).ok());

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Unable to start the async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(pipeline::run(
        &config,
        HttpClientConfig::default(),
        DotProgress::stderr(),
    ));

    ExitCode::from(exit_status(&result, cli.raise, config.ignore_errors))
}
