//! Service factory for building the setup step's dependencies.
//!
//! Services are built from configuration values but are not part of the
//! configuration itself.

use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};

use crate::{
    error::SetupError,
    http::{HttpClient, RetryPolicy},
    provider::GitHubProvider,
};

use super::config::{Config, Token};

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// Build an authenticated HTTP client for the releases API.
///
/// Requiring a [`Token`] means an empty credential can never reach the network.
pub fn build_http_client(token: &Token, retry: RetryPolicy) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
        .map_err(|_| SetupError::InvalidToken)?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
    headers.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static(API_VERSION),
    );
    debug!("HTTP client configured with authentication, {:?}", retry);

    let client = Client::builder()
        .user_agent(concat!("setup-network-hub/", env!("SETUP_NETWORK_HUB_VERSION")))
        .default_headers(headers)
        .build()?;

    Ok(HttpClient::with_retry_policy(client, retry))
}

/// Container for the services one setup run needs.
pub struct Services {
    pub http_client: HttpClient,
    pub provider: GitHubProvider,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = build_http_client(&config.token, config.retry)?;
        let provider = GitHubProvider::from_http_client(http_client.clone(), &config.api_url);
        Ok(Self {
            http_client,
            provider,
        })
    }
}
