//! Setup use case - orchestrates one run of the setup step.
//!
//! This use case coordinates:
//! - Platform normalization
//! - Release lookup and asset selection
//! - Download into the install directory
//! - Publishing the version output and the search path entry

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::action::Pipeline;
use crate::asset::{AssetPicker, ExactNamePicker};
use crate::download::fetch_asset;
use crate::http::HttpClient;
use crate::platform::{HostPlatform, TargetPlatform, normalize};
use crate::provider::{Provider, ReleaseAsset, RepoId};
use crate::runtime::Runtime;
use crate::version::ExplicitVersion;

/// Output name carrying the installed tag.
pub const VERSION_OUTPUT: &str = "version";

/// Options for the setup use case
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub version: ExplicitVersion,
    pub repo: RepoId,
    /// Directory the binary is placed in and added to the search path.
    pub install_dir: PathBuf,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupOutcome {
    pub version: String,
    pub asset_name: String,
    pub binary_path: PathBuf,
    pub install_dir: PathBuf,
}

pub struct SetupUseCase<'a, R: Runtime> {
    runtime: &'a R,
    provider: &'a dyn Provider,
    http_client: &'a HttpClient,
    pipeline: &'a dyn Pipeline,
    options: SetupOptions,
}

impl<'a, R: Runtime> SetupUseCase<'a, R> {
    pub fn new(
        runtime: &'a R,
        provider: &'a dyn Provider,
        http_client: &'a HttpClient,
        pipeline: &'a dyn Pipeline,
        options: SetupOptions,
    ) -> Self {
        Self {
            runtime,
            provider,
            http_client,
            pipeline,
            options,
        }
    }

    /// Find the asset built for `target` in the release matching the version.
    #[tracing::instrument(skip(self))]
    pub async fn locate(&self, target: &TargetPlatform) -> Result<ReleaseAsset> {
        let tag = self.options.version.tag();
        let release = self
            .provider
            .get_release_by_tag(&self.options.repo, tag)
            .await?;

        let picker = ExactNamePicker::new(target.executable_name());
        debug!(
            "Looking for {} among {} assets of {}",
            picker.name(),
            release.assets.len(),
            release.tag
        );
        let asset = picker.pick(&release.assets)?;
        info!("Found asset {} in release {}", asset.name, release.tag);
        Ok(asset.clone())
    }

    /// Download `asset` into the install directory under the tool's bare name.
    pub async fn fetch(&self, asset: &ReleaseAsset, target: &TargetPlatform) -> Result<PathBuf> {
        let destination = self.options.install_dir.join(target.binary_file_name());
        fetch_asset(self.runtime, self.http_client, asset, &destination).await
    }

    /// Publish the version output and put the binary's directory on the search path.
    pub fn publish(&self, binary_path: &Path) -> Result<PathBuf> {
        let dir = binary_path
            .parent()
            .with_context(|| format!("{} has no parent directory", binary_path.display()))?;

        self.pipeline
            .set_output(VERSION_OUTPUT, self.options.version.tag())?;
        self.pipeline.add_path(dir)?;
        Ok(dir.to_path_buf())
    }

    /// Run the whole setup for `host`. Nothing is published unless the
    /// binary is in place.
    #[tracing::instrument(skip(self), fields(version = %self.options.version))]
    pub async fn run(&self, host: &HostPlatform) -> Result<SetupOutcome> {
        let target = normalize(&host.os, &host.arch)?;
        info!(
            "Setting up network-hub {} for {}",
            self.options.version, target
        );

        let asset = self.locate(&target).await?;
        let binary_path = self.fetch(&asset, &target).await?;
        let install_dir = self.publish(&binary_path)?;

        Ok(SetupOutcome {
            version: self.options.version.tag().to_string(),
            asset_name: asset.name,
            binary_path,
            install_dir,
        })
    }
}
