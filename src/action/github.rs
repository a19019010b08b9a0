//! GitHub Actions file commands.
//!
//! Outputs go to the file named by `GITHUB_OUTPUT`, search path entries to the
//! file named by `GITHUB_PATH`. When a variable is unset (old runners, local
//! runs) the equivalent `::command::` line is printed instead.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::runtime::Runtime;

use super::Pipeline;

pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
pub const GITHUB_PATH: &str = "GITHUB_PATH";

pub struct GitHubActions<'a, R: Runtime> {
    runtime: &'a R,
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    commands: Mutex<Box<dyn Write + Send>>,
}

impl<'a, R: Runtime> GitHubActions<'a, R> {
    /// Reads the file command locations from the environment and prints
    /// workflow commands to stdout.
    pub fn from_env(runtime: &'a R) -> Self {
        let file_from_env = |key: &str| {
            runtime
                .env_var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        Self::new(
            runtime,
            file_from_env(GITHUB_OUTPUT),
            file_from_env(GITHUB_PATH),
            Box::new(std::io::stdout()),
        )
    }

    pub fn new(
        runtime: &'a R,
        output_file: Option<PathBuf>,
        path_file: Option<PathBuf>,
        commands: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            runtime,
            output_file,
            path_file,
            commands: Mutex::new(commands),
        }
    }

    fn issue_command(&self, line: &str) -> Result<()> {
        let mut out = self
            .commands
            .lock()
            .map_err(|_| anyhow::anyhow!("Workflow command writer is poisoned"))?;
        writeln!(out, "{}", line).context("Failed to write workflow command")?;
        out.flush().context("Failed to write workflow command")
    }
}

impl<R: Runtime> Pipeline for GitHubActions<'_, R> {
    #[tracing::instrument(skip(self))]
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => {
                debug!("Writing output {} to {:?}", name, file);
                let entry = output_entry(name, value, &heredoc_delimiter())?;
                self.runtime
                    .append(file, entry.as_bytes())
                    .with_context(|| format!("Failed to set output '{}'", name))
            }
            None => self.issue_command(&format!(
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            )),
        }
    }

    #[tracing::instrument(skip(self))]
    fn add_path(&self, dir: &Path) -> Result<()> {
        info!("Adding {} to PATH", dir.display());
        match &self.path_file {
            Some(file) => self
                .runtime
                .append(file, format!("{}\n", dir.display()).as_bytes())
                .with_context(|| format!("Failed to add {} to PATH", dir.display())),
            None => self.issue_command(&format!("::add-path::{}", dir.display())),
        }
    }

    fn set_failed(&self, message: &str) {
        if let Err(e) = self.issue_command(&format!("::error::{}", escape_data(message))) {
            eprintln!("{}: {}", message, e);
        }
    }
}

/// Formats one `GITHUB_OUTPUT` entry. Single-line values use `name=value`;
/// multi-line values use the heredoc form with `delimiter`.
fn output_entry(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.is_empty() || name.contains(['=', '\n', '\r']) {
        anyhow::bail!("Invalid output name '{}'", name);
    }

    if !value.contains(['\n', '\r']) {
        return Ok(format!("{}={}\n", name, value));
    }

    if value.contains(delimiter) {
        anyhow::bail!(
            "Output '{}' contains the delimiter '{}' and cannot be written",
            name,
            delimiter
        );
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

fn heredoc_delimiter() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("ghadelimiter_{}_{}", std::process::id(), nanos)
}

/// Escapes the data part of a workflow command.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
