use anyhow::Result;
use log::info;

use crate::{
    action::Pipeline,
    application::{SetupOptions, SetupOutcome, SetupUseCase},
    platform::HostPlatform,
    runtime::Runtime,
};

pub mod config;
mod services;

pub use config::{Config, Inputs, Token};
pub use services::{Services, build_http_client};

/// Install the requested network-hub release for `host` and publish it to the pipeline.
///
/// Inputs are validated before any request is made.
#[tracing::instrument(skip(runtime, pipeline, inputs))]
pub async fn setup<R: Runtime>(
    runtime: &R,
    pipeline: &dyn Pipeline,
    inputs: Inputs,
    host: &HostPlatform,
) -> Result<SetupOutcome> {
    let config = Config::load(runtime, inputs)?;
    let services = Services::from_config(&config)?;

    let use_case = SetupUseCase::new(
        runtime,
        &services.provider,
        &services.http_client,
        pipeline,
        SetupOptions {
            version: config.version,
            repo: config.repo,
            install_dir: config.install_dir,
        },
    );

    let outcome = use_case.run(host).await?;
    info!(
        "network-hub {} is available at {}",
        outcome.version,
        outcome.binary_path.display()
    );
    Ok(outcome)
}
