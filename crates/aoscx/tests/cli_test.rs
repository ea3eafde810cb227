//! Integration tests for the `aoscx` CLI binary.
//!
//! Argument parsing, help output, completions and exit codes run without
//! a switch; the end-to-end cases talk to a wiremock switch.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `aoscx` binary isolated from the user's
/// configuration, environment and keyring.
fn aoscx_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("aoscx");
    cmd.env("HOME", "/tmp/aoscx-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/aoscx-cli-test-nonexistent")
        .env("AOSCX_KEYRING", "false")
        .env_remove("AOSCX_HOSTNAME")
        .env_remove("AOSCX_USERNAME")
        .env_remove("AOSCX_PASSWORD")
        .env_remove("AOSCX_VERIFY_CERT")
        .env_remove("AOSCX_VERSION")
        .env_remove("AOSCX_TIMEOUT")
        .env_remove("AOSCX_CA_CERT")
        .env_remove("AOSCX_TRUNK_POLICY")
        .env_remove("AOSCX_CACHE_VLANS")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Mount version probe, login and logout on a mock switch.
async fn mock_switch() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "latest": { "version": "v10.09" } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v10.09/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "id=cli-session; Path=/")
                .insert_header("x-csrf-token", "cli-token"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v10.09/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || {
        aoscx_cmd()
            .env("AOSCX_PASSWORD", "secret")
            .args(args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = aoscx_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_resources() {
    aoscx_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("vlan")
            .and(predicate::str::contains("lag"))
            .and(predicate::str::contains("interface"))
            .and(predicate::str::contains("l2")),
    );
}

#[test]
fn version_flag() {
    aoscx_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aoscx"));
}

#[test]
fn lag_subcommands_exist() {
    aoscx_cmd().args(["lag", "--help"]).assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("update"))
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn completions_zsh() {
    aoscx_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn completions_bash() {
    aoscx_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn unknown_admin_state_lists_valid_options() {
    aoscx_cmd()
        .args(["lag", "create", "lag60", "--admin", "sideways"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("valid options are 'up', 'down'"));
}

#[test]
fn unknown_vlan_mode_is_rejected() {
    aoscx_cmd()
        .args(["l2", "configure", "1/1/3", "--vlan-mode", "hybrid"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("vlan_mode"));
}

#[test]
fn non_numeric_trunk_is_rejected() {
    aoscx_cmd()
        .args(["lag", "create", "lag60", "--vlan-trunks", "100,abc"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn missing_host_is_a_usage_error() {
    aoscx_cmd()
        .args(["vlan", "get", "100"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No switch configured"));
}

#[test]
fn missing_password_is_an_auth_error() {
    aoscx_cmd()
        .args(["--host", "10.0.0.5", "vlan", "get", "100"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No password configured"));
}

#[test]
fn unreachable_switch_is_a_connection_error() {
    aoscx_cmd()
        .env("AOSCX_PASSWORD", "secret")
        .args(["--host", "http://127.0.0.1:1", "--timeout", "2", "vlan", "get", "100"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}

#[test]
fn config_file_supplies_host() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("aoscx.toml");
    std::fs::write(&file, "hostname = \"10.0.0.5\"\nkeyring = false\n").unwrap();

    // Host comes from the file, so the failure is the missing password.
    aoscx_cmd()
        .arg("--config")
        .arg(&file)
        .args(["vlan", "get", "100"])
        .assert()
        .code(3);
}

// ── Against a mock switch ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn vlan_create_against_switch() {
    let server = mock_switch().await;
    Mock::given(method("POST"))
        .and(path("/rest/v10.09/system/vlans"))
        .and(body_partial_json(json!({ "id": 600, "name": "uplink" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(vec![
        "--host".into(),
        server.uri(),
        "vlan".into(),
        "create".into(),
        "600".into(),
        "--name".into(),
        "uplink".into(),
    ])
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Created VLAN 600"));
}

#[tokio::test(flavor = "multi_thread")]
async fn lag_get_renders_json() {
    let server = mock_switch().await;
    Mock::given(method("GET"))
        .and(path("/rest/v10.09/system/interfaces/lag60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "to core",
            "admin": "up",
            "lacp": "active",
            "vlan_mode": "native-untagged",
            "vlan_tag": { "100": "/rest/v10.09/system/vlans/100" },
            "vlan_trunks": {
                "100": "/rest/v10.09/system/vlans/100",
                "600": "/rest/v10.09/system/vlans/600"
            }
        })))
        .mount(&server)
        .await;

    let output = run(vec![
        "--host".into(),
        server.uri(),
        "-o".into(),
        "json".into(),
        "lag".into(),
        "get".into(),
        "lag60".into(),
    ])
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["name"], "lag60");
    assert_eq!(view["lacp"], "active");
    assert_eq!(view["vlan"]["vlan_mode"], "native-untagged");
    assert_eq!(view["vlan"]["vlan_tag"], 100);
    assert_eq!(view["vlan"]["vlan_trunks"], json!([100, 600]));
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_missing_lag_exits_not_found() {
    let server = mock_switch().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v10.09/system/interfaces/lag9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = run(vec![
        "--host".into(),
        server.uri(),
        "lag".into(),
        "delete".into(),
        "lag9".into(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("LAG 'lag9' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_lag_update_is_a_general_failure() {
    let server = mock_switch().await;
    Mock::given(method("GET"))
        .and(path("/rest/v10.09/system/interfaces/lag5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "old",
            "admin": "up"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v10.09/system/interfaces/lag5"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(vec![
        "--host".into(),
        server.uri(),
        "lag".into(),
        "update".into(),
        "lag5".into(),
        "--description".into(),
        "x".into(),
    ])
    .await;

    let text = combined_output(&output);
    assert_eq!(output.status.code(), Some(1), "{text}");
    assert!(text.contains("400 Bad Request"), "{text}");
    assert!(!text.contains("not found"), "{text}");
}
