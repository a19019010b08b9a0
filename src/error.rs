//! Error taxonomy for the setup step.
//!
//! Domain failures are represented by [`SetupError`] and travel inside
//! `anyhow::Error`. Anything else (network, HTTP status, filesystem) is a
//! transport failure.

use std::fmt;

/// Stage a failure belongs to. Used to prefix the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid inputs. Raised before any network activity.
    Configuration,
    /// The host platform cannot be mapped to a release asset.
    Resolution,
    /// The release or the platform asset does not exist remotely.
    Lookup,
    /// Network, HTTP status or filesystem failure.
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Resolution => write!(f, "resolution"),
            ErrorKind::Lookup => write!(f, "lookup"),
            ErrorKind::Transport => write!(f, "transport"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The `version` input is absent or blank
    MissingVersion,
    /// The `version` input is not a fully specified version
    InvalidVersion(String),
    /// The `token` input is absent or blank
    MissingToken,
    /// The `token` input holds characters an HTTP header cannot carry
    InvalidToken,
    /// The `repository` input is not in `owner/repo` form
    InvalidRepository(String),
    /// The `retries` input is not a non-negative integer
    InvalidRetries(String),
    UnsupportedPlatform(String),
    UnsupportedArchitecture(String),
    /// No release carries the requested tag
    ReleaseNotFound { tag: String, repo: String },
    /// The release has no asset with the expected name
    AssetNotFound(String),
    /// The release has several assets with the expected name
    DuplicateAsset { name: String, count: usize },
}

impl SetupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SetupError::MissingVersion
            | SetupError::InvalidVersion(_)
            | SetupError::MissingToken
            | SetupError::InvalidToken
            | SetupError::InvalidRepository(_)
            | SetupError::InvalidRetries(_) => ErrorKind::Configuration,
            SetupError::UnsupportedPlatform(_) | SetupError::UnsupportedArchitecture(_) => {
                ErrorKind::Resolution
            }
            SetupError::ReleaseNotFound { .. }
            | SetupError::AssetNotFound(_)
            | SetupError::DuplicateAsset { .. } => ErrorKind::Lookup,
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::MissingVersion => write!(f, "No version specified"),
            SetupError::InvalidVersion(v) => write!(
                f,
                "Invalid version '{}': expected an explicit version such as v1.2.3",
                v
            ),
            SetupError::MissingToken => write!(f, "No GitHub token found"),
            SetupError::InvalidToken => write!(
                f,
                "GitHub token contains control characters and cannot be sent"
            ),
            SetupError::InvalidRepository(r) => write!(
                f,
                "Invalid repository '{}'. Expected 'owner/repo'.",
                r
            ),
            SetupError::InvalidRetries(r) => write!(f, "Invalid retries input '{}'", r),
            SetupError::UnsupportedPlatform(os) => write!(f, "Unsupported platform: {}", os),
            SetupError::UnsupportedArchitecture(arch) => {
                write!(f, "Unsupported architecture: {}", arch)
            }
            SetupError::ReleaseNotFound { tag, repo } => {
                write!(f, "Release not found for tag {} in {}", tag, repo)
            }
            SetupError::AssetNotFound(name) => write!(f, "Release asset not found for {}", name),
            SetupError::DuplicateAsset { name, count } => write!(
                f,
                "Release has {} assets named {}, refusing to guess",
                count, name
            ),
        }
    }
}

impl std::error::Error for SetupError {}

/// Classifies an error chain into the stage that produced it.
pub fn classify(error: &anyhow::Error) -> ErrorKind {
    error
        .downcast_ref::<SetupError>()
        .or_else(|| {
            error
                .chain()
                .find_map(|cause| cause.downcast_ref::<SetupError>())
        })
        .map(SetupError::kind)
        .unwrap_or(ErrorKind::Transport)
}

/// Builds the single-line failure message reported to the pipeline.
pub fn failure_message(error: &anyhow::Error) -> String {
    let stage = classify(error);
    let detail = error
        .chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ");
    format!("{} error: {}", stage, detail)
}
