//! End-to-end CLI runs against the built-in demo fleet

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn fleetdeck(settings: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fleetdeck").unwrap();
    cmd.env_remove("FLEETDECK_ENDPOINT")
        .env_remove("RUST_LOG")
        .env("FLEETDECK_SETTINGS", settings)
        .arg("--offline");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_overview_counts() {
    let dir = TempDir::new().unwrap();
    let json = json_output(fleetdeck(&dir.path().join("s.toml")).arg("overview"));

    assert_eq!(json["overview"]["total_hosts"], 12);
    assert_eq!(json["overview"]["total_alerts_active"], 7);
    assert_eq!(json["active_by_severity"]["critical"], 4);
    assert_eq!(json["active_by_severity"]["warning"], 3);
    assert_eq!(json["active_by_severity"]["info"], 0);
}

#[test]
fn test_overview_hourly_timeline() {
    let dir = TempDir::new().unwrap();
    let json = json_output(fleetdeck(&dir.path().join("s.toml")).arg("overview"));
    let buckets = json["timeline"].as_array().unwrap();
    assert_eq!(buckets.len(), 24);
    assert_eq!(buckets[0]["hours_ago"], 23);
    assert_eq!(buckets[23]["hours_ago"], 0);

    let total = |key: &str| buckets.iter().map(|b| b[key].as_u64().unwrap()).sum::<u64>();
    assert_eq!(total("critical"), 4);
    assert_eq!(total("warning"), 3);
}

#[test]
fn test_hosts_filter_by_status() {
    let dir = TempDir::new().unwrap();
    let json = json_output(
        fleetdeck(&dir.path().join("s.toml")).args(["hosts", "--status", "offline"]),
    );
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["items"][0]["hostname"], "edge-proxy-01");
}

#[test]
fn test_hosts_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    fleetdeck(&dir.path().join("s.toml"))
        .args(["hosts", "--status", "sleeping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sleeping"));
}

#[test]
fn test_alerts_sorted_critical_first() {
    let dir = TempDir::new().unwrap();
    let json = json_output(fleetdeck(&dir.path().join("s.toml")).arg("alerts"));
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 8);
    assert_eq!(items[0]["severity"], "critical");
    assert_eq!(items[7]["severity"], "info");
}

#[test]
fn test_alerts_grouped_by_host() {
    let dir = TempDir::new().unwrap();
    let json = json_output(
        fleetdeck(&dir.path().join("s.toml")).args(["alerts", "--search", "gpu", "--group-by-host"]),
    );
    let groups = json["items"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["hostname"], "gpu-server-03");
    assert_eq!(groups[0]["alerts"].as_array().unwrap().len(), 2);
}

#[test]
fn test_ack_never_fails() {
    let dir = TempDir::new().unwrap();
    fleetdeck(&dir.path().join("s.toml"))
        .args(["ack", "no-such-alert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acknowledged"));
}

#[test]
fn test_review_conflict_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    fleetdeck(&dir.path().join("s.toml"))
        .args(["approve", "hc-2"])
        .assert()
        .failure();
}

#[test]
fn test_execute_approved_check() {
    let dir = TempDir::new().unwrap();
    let json = json_output(
        fleetdeck(&dir.path().join("s.toml")).args(["execute", "hc-2", "--yes"]),
    );
    assert_eq!(json["check_id"], "hc-2");
    assert_eq!(json["status"], "completed");
}

#[test]
fn test_execute_without_yes_needs_terminal() {
    let dir = TempDir::new().unwrap();
    fleetdeck(&dir.path().join("s.toml"))
        .args(["execute", "hc-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_checks_pending_tab() {
    let dir = TempDir::new().unwrap();
    let json = json_output(
        fleetdeck(&dir.path().join("s.toml")).args(["checks", "--tab", "pending"]),
    );
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "hc-1");
}

#[test]
fn test_host_detail_unknown_host() {
    let dir = TempDir::new().unwrap();
    fleetdeck(&dir.path().join("s.toml"))
        .args(["host", "nope-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Host not found"));
}

#[test]
fn test_metrics_range() {
    let dir = TempDir::new().unwrap();
    let json = json_output(
        fleetdeck(&dir.path().join("s.toml")).args(["metrics", "web-server-01", "--range", "1h"]),
    );
    // 15s spacing over one hour
    assert_eq!(json.as_array().unwrap().len(), 240);
}

#[test]
fn test_settings_set_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("s.toml");

    fleetdeck(&path)
        .args(["settings", "set", "--endpoint", "http://fleet.local:9000/", "--refresh", "60"])
        .assert()
        .success();

    let json = json_output(fleetdeck(&path).args(["settings", "show"]));
    assert_eq!(json["api_endpoint"], "http://fleet.local:9000");
    assert_eq!(json["refresh_interval_secs"], 60);
    assert_eq!(json["theme"], "dark");
}

#[test]
fn test_settings_invalid_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("s.toml");

    fleetdeck(&path)
        .args(["settings", "set", "--endpoint", "ftp://x", "--refresh", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_endpoint"))
        .stderr(predicate::str::contains("refresh_interval"));

    assert!(!path.exists());
}
