//! Release provider abstraction.
//!
//! A provider answers one question: which assets are attached to the release
//! with a given tag. GitHub is the only implementation.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SetupError;

pub use github::{DEFAULT_API_URL, GitHubProvider};

/// Repository publishing the network-hub releases.
pub const DEFAULT_OWNER: &str = "vechain";
pub const DEFAULT_REPO: &str = "networkhub";

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl Default for RepoId {
    fn default() -> Self {
        RepoId {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(RepoId {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(SetupError::InvalidRepository(s.to_string())),
        }
    }
}

/// A downloadable asset from a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    /// API URL of the asset; serves the raw bytes when asked for `application/octet-stream`.
    pub download_url: String,
}

/// A release from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Release {
    /// Version tag (e.g., "v1.0.0")
    pub tag: String,
    /// Release name/title
    pub name: Option<String>,
    /// Downloadable assets
    pub assets: Vec<ReleaseAsset>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fetch the release carrying exactly `tag`.
    ///
    /// Fails with [`SetupError::ReleaseNotFound`] when no such release exists.
    async fn get_release_by_tag(&self, repo: &RepoId, tag: &str) -> Result<Release>;
}
