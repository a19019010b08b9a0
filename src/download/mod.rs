use crate::http::HttpClient;
use crate::provider::ReleaseAsset;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Content type that makes the releases API serve the asset bytes instead of its metadata.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Mode applied to the downloaded binary.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Downloads `asset` to `destination` and makes it executable.
///
/// The body is streamed into a `.part` file next to the destination and only
/// renamed into place once complete, so a failed run never leaves a truncated
/// binary behind. Returns the absolute path of the binary.
#[tracing::instrument(skip(runtime, http_client, asset), fields(asset = %asset.name))]
pub async fn fetch_asset<R: Runtime>(
    runtime: &R,
    http_client: &HttpClient,
    asset: &ReleaseAsset,
    destination: &Path,
) -> Result<PathBuf> {
    info!("Downloading {} from {}...", asset.name, asset.download_url);

    let dir = destination
        .parent()
        .with_context(|| format!("Destination {} has no parent directory", destination.display()))?;
    runtime.create_dir_all(dir)?;

    let part_path = part_path(destination);
    if let Err(e) = download_into(runtime, http_client, asset, &part_path, destination).await {
        discard_partial(runtime, &part_path);
        return Err(e);
    }

    runtime
        .set_permissions(destination, EXECUTABLE_MODE)
        .with_context(|| format!("Failed to make {} executable", destination.display()))?;

    if !looks_like_executable(runtime, destination) {
        warn!(
            "{} does not look like a native executable; the server may have returned something other than the binary",
            destination.display()
        );
    }

    log_directory(runtime, dir);

    let binary_path = runtime.canonicalize(destination)?;
    info!("Successfully downloaded network-hub to {}", binary_path.display());
    Ok(binary_path)
}

async fn download_into<R: Runtime>(
    runtime: &R,
    http_client: &HttpClient,
    asset: &ReleaseAsset,
    part_path: &Path,
    destination: &Path,
) -> Result<()> {
    let bytes = http_client
        .download_file(&asset.download_url, OCTET_STREAM, || {
            runtime
                .create_file(part_path)
                .with_context(|| format!("Failed to create temporary file at {:?}", part_path))
        })
        .await
        .with_context(|| format!("Failed to download {}", asset.name))?;

    if asset.size > 0 && bytes != asset.size {
        warn!(
            "Downloaded {} bytes for {} but the release lists {} bytes",
            bytes, asset.name, asset.size
        );
    }

    runtime
        .rename(part_path, destination)
        .with_context(|| format!("Failed to move download into {}", destination.display()))
}

fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

fn discard_partial<R: Runtime>(runtime: &R, part_path: &Path) {
    if runtime.exists(part_path) {
        if let Err(e) = runtime.remove_file(part_path) {
            warn!("Failed to remove partial download {:?}: {}", part_path, e);
        }
    }
}

/// True when the file parses as an ELF, Mach-O or PE image.
fn looks_like_executable<R: Runtime>(runtime: &R, path: &Path) -> bool {
    let mut buffer = Vec::new();
    match runtime.open(path) {
        Ok(mut file) => file.read_to_end(&mut buffer).is_ok() && is_executable_image(&buffer),
        Err(_) => false,
    }
}

pub fn is_executable_image(bytes: &[u8]) -> bool {
    matches!(
        goblin::Object::parse(bytes),
        Ok(goblin::Object::Elf(_)) | Ok(goblin::Object::Mach(_)) | Ok(goblin::Object::PE(_))
    )
}

fn log_directory<R: Runtime>(runtime: &R, dir: &Path) {
    match runtime.read_dir(dir) {
        Ok(entries) => {
            for entry in entries {
                debug!("{}", entry.display());
            }
        }
        Err(e) => debug!("Failed to list {:?}: {}", dir, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::Sequence;
    use mockall::predicate::eq;
    use reqwest::Client;
    use tempfile::tempdir;

    fn asset_at(url: &str, size: u64) -> ReleaseAsset {
        ReleaseAsset {
            id: 7,
            name: "network-hub-linux-amd64".into(),
            size,
            download_url: format!("{}/repos/vechain/networkhub/releases/assets/7", url),
        }
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/tools/network-hub/network-hub")),
            PathBuf::from("/tools/network-hub/network-hub.part")
        );
        assert_eq!(
            part_path(Path::new("bin/network-hub.exe")),
            PathBuf::from("bin/network-hub.exe.part")
        );
    }

    #[test]
    fn test_is_executable_image() {
        assert!(!is_executable_image(br#"{"url": "https://api.github.com"}"#));
        assert!(!is_executable_image(b""));

        // The test binary itself is a native executable.
        let me = std::fs::read(std::env::current_exe().unwrap()).unwrap();
        assert!(is_executable_image(&me));
    }

    #[test]
    fn test_looks_like_executable_reads_file() {
        let dir = tempdir().unwrap();
        let native = dir.path().join("native");
        let json = dir.path().join("json");
        std::fs::copy(std::env::current_exe().unwrap(), &native).unwrap();
        std::fs::write(&json, br#"{"id": 7, "name": "network-hub-linux-amd64"}"#).unwrap();

        assert!(looks_like_executable(&RealRuntime, &native));
        assert!(!looks_like_executable(&RealRuntime, &json));
        assert!(!looks_like_executable(&RealRuntime, &dir.path().join("missing")));
    }

    #[test]
    fn test_looks_like_executable_read_failure() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("device gone"))
            }
        }

        let mut runtime = MockRuntime::new();
        runtime.expect_open().returning(|_| Ok(Box::new(Broken)));

        assert!(!looks_like_executable(&runtime, Path::new("/tools/network-hub")));
    }

    #[tokio::test]
    async fn test_fetch_asset_call_order() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/vechain/networkhub/releases/assets/7")
            .match_header("accept", OCTET_STREAM)
            .with_status(200)
            .with_body("binary")
            .create_async()
            .await;

        let destination = PathBuf::from("/tools/network-hub/network-hub");
        let part = PathBuf::from("/tools/network-hub/network-hub.part");

        let mut runtime = MockRuntime::new();
        let mut seq = Sequence::new();

        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/tools/network-hub")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        runtime
            .expect_create_file()
            .with(eq(part.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Box::new(std::io::sink())));
        runtime
            .expect_rename()
            .with(eq(part.clone()), eq(destination.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        runtime
            .expect_set_permissions()
            .with(eq(destination.clone()), eq(EXECUTABLE_MODE))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        runtime
            .expect_open()
            .returning(|_| Ok(Box::new(std::io::Cursor::new(b"binary".to_vec()))));
        runtime.expect_read_dir().returning(|_| Ok(vec![]));
        runtime
            .expect_canonicalize()
            .returning(|p| Ok(p.to_path_buf()));

        let http_client = HttpClient::new(Client::new());
        let path = fetch_asset(&runtime, &http_client, &asset_at(&url, 6), &destination)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(path, destination);
    }

    #[tokio::test]
    async fn test_fetch_asset_not_found_touches_nothing() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/vechain/networkhub/releases/assets/7")
            .with_status(404)
            .create_async()
            .await;

        // No create_file, rename or set_permissions expectations: calling them panics.
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime.expect_exists().returning(|_| false);

        let http_client = HttpClient::new(Client::new());
        let result = fetch_asset(
            &runtime,
            &http_client,
            &asset_at(&url, 0),
            Path::new("/tools/network-hub/network-hub"),
        )
        .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to download network-hub-linux-amd64"));
    }

    #[tokio::test]
    async fn test_fetch_asset_writes_executable_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/repos/vechain/networkhub/releases/assets/7")
            .with_status(200)
            .with_body("#!/bin/sh\necho network-hub\n")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let destination = dir.path().join("network-hub").join("network-hub");

        let http_client = HttpClient::new(Client::new());
        let path = fetch_asset(&RealRuntime, &http_client, &asset_at(&url, 0), &destination)
            .await
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#!/bin/sh\necho network-hub\n"
        );
        assert!(!part_path(&destination).exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn test_fetch_asset_server_error_leaves_no_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/repos/vechain/networkhub/releases/assets/7")
            .with_status(500)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let destination = dir.path().join("network-hub");

        let http_client = HttpClient::new(Client::new());
        let result =
            fetch_asset(&RealRuntime, &http_client, &asset_at(&url, 0), &destination).await;

        assert!(result.is_err());
        assert!(!destination.exists());
        assert!(!part_path(&destination).exists());
    }
}
