//! Integration tests for the zitilab binary
//!
//! Each test points the binary at the shared mock server through the
//! `GITHUB_*` variables and uses a unique repository owner so mocks from
//! parallel tests never collide.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use mockito::Mock;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use zitilab_release::{ArchiveFormat, Platform};
use zitilab_testkit::{
    FAKE_EXECUTABLE, get_shared_mock_server, release_json, tar_gz_with_member,
    temp_dir_in_workspace, zip_with_member,
};

/// Binary command with a clean, mock-backed environment
fn zitilab(server_url: &str, owner: &str, home: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.env("GITHUB_API_URL", server_url)
        .env("GITHUB_BASE_URL", server_url)
        .env("GITHUB_REPO_OWNER", owner)
        .env("GITHUB_REPO_NAME", "ziti")
        .env("ZITI_HOME", home)
        .env_remove("GITHUB_TOKEN")
        .env_remove("ZITI_VERSION_OVERRIDE")
        .env_remove("ZITI_BIN_DIR")
        .env_remove("ZITI_HEALTH_URL");
    cmd
}

/// Registers a release for the host platform whose executable holds `content`
fn mock_host_release(owner: &str, tag: &str, content: &[u8]) -> Option<(Vec<Mock>, String)> {
    let platform = Platform::detect().ok()?;
    let executable = platform.executable_name("ziti");
    let (archive_name, archive) = match platform.archive_format() {
        ArchiveFormat::Tar => (
            format!("{}{tag}.tar.gz", platform.asset_prefix("ziti")),
            tar_gz_with_member(&format!("ziti-{tag}/{executable}"), content),
        ),
        ArchiveFormat::Zip => (
            format!("{}{tag}.zip", platform.asset_prefix("ziti")),
            zip_with_member(&[(executable.as_str(), content)]),
        ),
    };

    let mut server = get_shared_mock_server();
    let latest = server
        .mock("GET", format!("/repos/{owner}/ziti/releases/latest").as_str())
        .with_status(200)
        .with_body(release_json(tag, &[&archive_name]))
        .create();
    let download = server
        .mock(
            "GET",
            format!("/{owner}/ziti/releases/download/{tag}/{archive_name}").as_str(),
        )
        .with_status(200)
        .with_body(archive)
        .expect(1)
        .create();
    Some((vec![latest, download], server.url()))
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("quickstart"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zitilab"));
}

#[test]
fn test_fetch_prints_staged_path() {
    let Some((mocks, url)) = mock_host_release("cli-fetch-owner", "v1.0.0", FAKE_EXECUTABLE) else {
        return;
    };
    let temp = temp_dir_in_workspace();

    let output = zitilab(&url, "cli-fetch-owner", temp.path())
        .arg("fetch")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let printed = String::from_utf8(output.stdout).unwrap();
    let path = Path::new(printed.trim());
    assert!(path.starts_with(temp.path().join("ziti-bin").join("ziti-v1.0.0")));
    assert_eq!(std::fs::read(path).unwrap(), FAKE_EXECUTABLE);

    // Second run reuses the staged executable (download mock expects 1 hit)
    zitilab(&url, "cli-fetch-owner", temp.path())
        .arg("fetch")
        .assert()
        .success()
        .stdout(predicate::str::contains(printed.trim()));

    for mock in &mocks[1..] {
        mock.assert();
    }
}

#[test]
fn test_fetch_json_output() {
    let Some((_mocks, url)) = mock_host_release("cli-json-owner", "v2.0.0", b"ziti") else {
        return;
    };
    let temp = temp_dir_in_workspace();

    let output = zitilab(&url, "cli-json-owner", temp.path())
        .args(["fetch", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], "v2.0.0");
    assert!(value["path"].as_str().unwrap().contains("ziti-v2.0.0"));
}

#[test]
fn test_fetch_unknown_version_fails() {
    let temp = temp_dir_in_workspace();
    let (_mock, url) = {
        let mut server = get_shared_mock_server();
        let mock = server
            .mock("GET", "/repos/cli-missing-owner/ziti/releases/tags/v0.0.1")
            .with_status(404)
            .create();
        (mock, server.url())
    };

    zitilab(&url, "cli-missing-owner", temp.path())
        .args(["fetch", "--version", "v0.0.1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: VERSION_NOT_FOUND"))
        .stderr(predicate::str::contains("v0.0.1"));
}

#[test]
fn test_owner_flag_overrides_environment() {
    let Some((_mocks, url)) = mock_host_release("cli-flag-owner", "v3.0.0", b"ziti") else {
        return;
    };
    let temp = temp_dir_in_workspace();

    zitilab(&url, "some-other-owner", temp.path())
        .args(["fetch", "--owner", "cli-flag-owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ziti-v3.0.0"));
}

#[test]
#[cfg(unix)]
fn test_quickstart_runs_command_and_propagates_exit_code() {
    let script = b"#!/bin/sh\nexec sleep 30\n";
    let Some((_mocks, url)) = mock_host_release("cli-quickstart-owner", "v1.0.0", script) else {
        return;
    };
    let _health = get_shared_mock_server()
        .mock("GET", "/cli-quickstart-health")
        .with_status(200)
        .create();
    let temp = temp_dir_in_workspace();

    zitilab(&url, "cli-quickstart-owner", temp.path())
        .args([
            "quickstart",
            "--health-url",
            &format!("{url}/cli-quickstart-health"),
            "--timeout",
            "10",
            "--grace",
            "2",
            "--",
            "sh",
            "-c",
            "command -v ziti && exit 3",
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("ziti-v1.0.0"));
}
