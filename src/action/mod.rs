//! Pipeline interface.
//!
//! The setup step talks to the surrounding CI pipeline through [`Pipeline`]:
//! step outputs, additions to the executable search path, and the failure
//! report. [`GitHubActions`] implements it with the runner's file commands.

mod github;

use anyhow::Result;
use std::path::Path;

pub use github::{GITHUB_OUTPUT, GITHUB_PATH, GitHubActions, escape_data};

#[cfg_attr(test, mockall::automock)]
pub trait Pipeline: Send + Sync {
    /// Publish a step output for later steps.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Make the binaries in `dir` callable by bare name in later steps.
    fn add_path(&self, dir: &Path) -> Result<()>;

    /// Mark the step as failed with a human-readable message.
    fn set_failed(&self, message: &str);
}
