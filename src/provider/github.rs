//! GitHub provider implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::error::SetupError;
use crate::http::{HttpClient, NonRetryableError};

use super::{Provider, Release, ReleaseAsset, RepoId};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        pub name: Option<String>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub id: u64,
        pub name: String,
        #[serde(default)]
        pub size: u64,
        pub url: String,
    }
}

pub struct GitHubProvider {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubProvider {
    pub fn from_http_client(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    #[tracing::instrument(skip(self, repo))]
    async fn get_release_by_tag(&self, repo: &RepoId, tag: &str) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url, repo.owner, repo.repo, tag
        );
        debug!("Fetching release {} from {}...", tag, url);

        match self.http_client.get_json::<api::Release>(&url).await {
            Ok(release) => Ok(release.into()),
            Err(e)
                if matches!(
                    e.downcast_ref::<NonRetryableError>(),
                    Some(NonRetryableError::NotFound(_))
                ) =>
            {
                Err(e.context(SetupError::ReleaseNotFound {
                    tag: tag.to_string(),
                    repo: repo.to_string(),
                }))
            }
            Err(e) => Err(e),
        }
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            tag: r.tag_name,
            name: r.name,
            assets: r.assets.into_iter().map(|a| a.into()).collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            id: a.id,
            name: a.name,
            size: a.size,
            download_url: a.url,
        }
    }
}
