use clap::Parser;
use log::error;
use setup_network_hub::{
    action::{GitHubActions, Pipeline},
    commands::{Inputs, setup},
    error::failure_message,
    platform::{DefaultPlatformDetector, PlatformDetector},
    runtime::RealRuntime,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// setup-network-hub - install network-hub in a CI job
///
/// Downloads the network-hub release asset built for this runner, places it in
/// the install directory and makes it callable by later steps.
///
/// Every option can also be given through the variable the Actions runner
/// sets for the step input of the same name.
///
/// Examples:
///   setup-network-hub --tag v0.0.3 --token "$GITHUB_TOKEN"
#[derive(Parser, Debug)]
#[command(author, version = env!("SETUP_NETWORK_HUB_VERSION"), about)]
struct Cli {
    /// Release tag to install, e.g. v0.0.3 (also via INPUT_VERSION)
    #[arg(long = "tag", env = "INPUT_VERSION", value_name = "TAG")]
    pub tag: Option<String>,

    /// Token for the GitHub API (also via INPUT_TOKEN)
    #[arg(long, env = "INPUT_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository publishing the releases (defaults to vechain/networkhub)
    #[arg(long, env = "INPUT_REPOSITORY", value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// Directory to place the binary in (defaults to network-hub next to this program)
    #[arg(long = "install-dir", env = "INPUT_INSTALL_DIR", value_name = "PATH")]
    pub install_dir: Option<PathBuf>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "GITHUB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Extra attempts for failed requests (defaults to 0)
    #[arg(long, env = "INPUT_RETRIES", value_name = "N")]
    pub retries: Option<String>,
}

impl Cli {
    fn into_inputs(self) -> Inputs {
        Inputs {
            version: self.tag,
            token: self.token,
            repository: self.repository,
            install_dir: self.install_dir,
            api_url: self.api_url,
            retries: self.retries,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let pipeline = GitHubActions::from_env(&runtime);
    let host = DefaultPlatformDetector.detect();

    match setup(&runtime, &pipeline, cli.into_inputs(), &host).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let message = failure_message(&e);
            error!("{}", message);
            pipeline.set_failed(&message);
            ExitCode::FAILURE
        }
    }
}
