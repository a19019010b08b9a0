use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use setup_network_hub::platform::{HostPlatform, TargetPlatform, normalize};
use std::path::Path;
use tempfile::tempdir;

fn host_target() -> TargetPlatform {
    let host = HostPlatform::detect();
    normalize(&host.os, &host.arch).unwrap()
}

/// The binary under a clean environment: no step inputs, no runner files.
fn setup_cmd() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("setup-network-hub"));
    for key in [
        "INPUT_VERSION",
        "INPUT_TOKEN",
        "INPUT_REPOSITORY",
        "INPUT_INSTALL_DIR",
        "INPUT_RETRIES",
        "GITHUB_API_URL",
        "GITHUB_OUTPUT",
        "GITHUB_PATH",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn release_body(url: &str, names: &[&str]) -> String {
    let assets = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                r#"{{"id": {id}, "name": "{name}", "size": 14,
                    "url": "{url}/repos/vechain/networkhub/releases/assets/{id}"}}"#,
                id = i + 1
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"tag_name": "v0.0.3", "name": "v0.0.3", "assets": [{assets}]}}"#)
}

#[test]
fn test_end_to_end_setup() {
    let mut server = Server::new();
    let url = server.url();
    let target = host_target();

    let _mock_release = server
        .mock("GET", "/repos/vechain/networkhub/releases/tags/v0.0.3")
        .match_header("authorization", "Bearer ghp_test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release_body(
            &url,
            &["checksums.txt", target.executable_name().as_str()],
        ))
        .create();

    let mock_download = server
        .mock("GET", "/repos/vechain/networkhub/releases/assets/2")
        .match_header("accept", "application/octet-stream")
        .with_status(200)
        .with_body("network-hub!!\n")
        .create();

    let work = tempdir().unwrap();
    let install_dir = work.path().join("tools");
    let output_file = work.path().join("output");
    let path_file = work.path().join("path");

    setup_cmd()
        .env("INPUT_VERSION", "v0.0.3")
        .env("INPUT_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", &url)
        .env("GITHUB_OUTPUT", &output_file)
        .env("GITHUB_PATH", &path_file)
        .arg("--install-dir")
        .arg(&install_dir)
        .assert()
        .success();

    mock_download.assert();

    let binary = install_dir.join(target.binary_file_name());
    assert_eq!(std::fs::read_to_string(&binary).unwrap(), "network-hub!!\n");
    assert_eq!(
        std::fs::read_to_string(&output_file).unwrap(),
        "version=v0.0.3\n"
    );

    let published = std::fs::read_to_string(&path_file).unwrap();
    assert_eq!(
        Path::new(published.trim_end()),
        std::fs::canonicalize(&install_dir).unwrap()
    );
}

#[test]
fn test_workflow_commands_without_runner_files() {
    let mut server = Server::new();
    let url = server.url();
    let target = host_target();

    let _mock_release = server
        .mock("GET", "/repos/vechain/networkhub/releases/tags/v0.0.3")
        .with_status(200)
        .with_body(release_body(&url, &[target.executable_name().as_str()]))
        .create();
    let _mock_download = server
        .mock("GET", "/repos/vechain/networkhub/releases/assets/1")
        .with_status(200)
        .with_body("network-hub!!\n")
        .create();

    let work = tempdir().unwrap();

    setup_cmd()
        .args(["--tag", "v0.0.3", "--token", "ghp_test", "--api-url", url.as_str()])
        .arg("--install-dir")
        .arg(work.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("::set-output name=version::v0.0.3"))
        .stdout(predicates::str::contains("::add-path::"));
}

#[test]
fn test_empty_token_fails_before_any_request() {
    let mut server = Server::new();
    let url = server.url();

    let mock_any = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create();

    let work = tempdir().unwrap();
    let output_file = work.path().join("output");

    setup_cmd()
        .env("INPUT_VERSION", "v0.0.3")
        .env("INPUT_TOKEN", "")
        .env("GITHUB_API_URL", &url)
        .env("GITHUB_OUTPUT", &output_file)
        .arg("--install-dir")
        .arg(work.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicates::str::contains(
            "::error::configuration error: No GitHub token found",
        ));

    mock_any.assert();
    assert!(!output_file.exists());
}

#[test]
fn test_missing_version_fails() {
    setup_cmd()
        .args(["--token", "ghp_test"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("No version specified"));
}

#[test]
fn test_non_explicit_version_fails() {
    setup_cmd()
        .args(["--tag", "latest", "--token", "ghp_test"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("::error::configuration error"))
        .stdout(predicates::str::contains("latest"));
}

#[test]
fn test_missing_asset_fails_and_installs_nothing() {
    let mut server = Server::new();
    let url = server.url();
    let target = host_target();

    let _mock_release = server
        .mock("GET", "/repos/vechain/networkhub/releases/tags/v0.0.3")
        .with_status(200)
        .with_body(release_body(&url, &["checksums.txt"]))
        .create();

    let work = tempdir().unwrap();
    let install_dir = work.path().join("tools");
    let path_file = work.path().join("path");

    setup_cmd()
        .args(["--tag", "v0.0.3", "--token", "ghp_test", "--api-url", url.as_str()])
        .env("GITHUB_PATH", &path_file)
        .arg("--install-dir")
        .arg(&install_dir)
        .assert()
        .failure()
        .stdout(predicates::str::contains(format!(
            "::error::lookup error: Release asset not found for {}",
            target.executable_name()
        )));

    assert!(!install_dir.join(target.binary_file_name()).exists());
    assert!(!path_file.exists());
}

#[test]
fn test_unknown_tag_fails() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_release = server
        .mock("GET", "/repos/vechain/networkhub/releases/tags/v9.9.9")
        .with_status(404)
        .create();

    let work = tempdir().unwrap();

    setup_cmd()
        .args(["--tag", "v9.9.9", "--token", "ghp_test", "--api-url", url.as_str()])
        .arg("--install-dir")
        .arg(work.path())
        .assert()
        .failure()
        .stdout(predicates::str::contains(
            "::error::lookup error: Release not found for tag v9.9.9 in vechain/networkhub",
        ));
}
