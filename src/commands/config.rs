use anyhow::{Context, Result};
use log::debug;
use std::fmt;
use std::path::PathBuf;

use crate::error::SetupError;
use crate::http::RetryPolicy;
use crate::platform::TOOL_NAME;
use crate::provider::{DEFAULT_API_URL, RepoId};
use crate::runtime::Runtime;
use crate::version::ExplicitVersion;

/// Raw step inputs as received from the command line or the `INPUT_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub version: Option<String>,
    pub token: Option<String>,
    pub repository: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub api_url: Option<String>,
    pub retries: Option<String>,
}

/// Credential for the releases API. Never empty, never holds control characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: &str) -> Result<Self, SetupError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SetupError::MissingToken);
        }
        if value.chars().any(char::is_control) {
            return Err(SetupError::InvalidToken);
        }
        Ok(Self(value.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(****)")
    }
}

/// Validated configuration of one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub version: ExplicitVersion,
    pub token: Token,
    pub repo: RepoId,
    pub api_url: String,
    pub install_dir: PathBuf,
    pub retry: RetryPolicy,
}

impl Config {
    /// Validates the inputs. The version is checked before the token; no
    /// network access happens here.
    #[tracing::instrument(skip(runtime, inputs))]
    pub fn load<R: Runtime>(runtime: &R, inputs: Inputs) -> Result<Self> {
        let version = ExplicitVersion::from_input(non_blank(inputs.version.as_deref()))?;
        let token = Token::new(inputs.token.as_deref().unwrap_or_default())?;

        let repo = match non_blank(inputs.repository.as_deref()) {
            Some(repository) => repository.parse::<RepoId>()?,
            None => RepoId::default(),
        };

        let api_url = non_blank(inputs.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        let retries = match non_blank(inputs.retries.as_deref()) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| SetupError::InvalidRetries(value.to_string()))?,
            None => 0,
        };

        let install_dir = match inputs.install_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => default_install_dir(runtime)?,
        };

        debug!(
            "Configured {} {} from {} into {:?}",
            repo, version, api_url, install_dir
        );

        Ok(Self {
            version,
            token,
            repo,
            api_url,
            install_dir,
            retry: RetryPolicy::with_retries(retries),
        })
    }
}

/// `<directory of the running binary>/network-hub`
fn default_install_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let exe = runtime.current_exe()?;
    let dir = exe
        .parent()
        .with_context(|| format!("Executable {} has no parent directory", exe.display()))?;
    Ok(dir.join(TOOL_NAME))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
