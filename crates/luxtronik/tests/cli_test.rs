//! Integration tests for the `luxtronik` CLI binary.
//!
//! Every test runs against a private copy of the fixture snapshot, with
//! config directories pointed at a nonexistent path.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

fn luxtronik_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("luxtronik");
    cmd.env("HOME", "/tmp/luxtronik-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/luxtronik-cli-test-nonexistent")
        .env_remove("LUXTRONIK_SNAPSHOT")
        .env_remove("LUXTRONIK_CONFIG")
        .env_remove("LUXTRONIK_OUTPUT")
        .env_remove("LUXTRONIK_HOST")
        .env_remove("LUXTRONIK_LANGUAGE")
        .env("LUXTRONIK_WRITE_REFRESH_DELAY", "0");
    cmd
}

fn fixture_copy() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("heatpump.json");
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/heatpump.json");
    std::fs::copy(fixture, &path).unwrap();
    (dir, path)
}

fn with_snapshot(path: &Path) -> assert_cmd::Command {
    let mut cmd = luxtronik_cmd();
    cmd.arg("--snapshot").arg(path);
    cmd
}

fn saved_value(path: &Path, group: &str, name: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json[group]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == name)
        .map(|f| f["value"].clone())
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = luxtronik_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in:\n{stderr}");
}

#[test]
fn test_help_flag() {
    luxtronik_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Luxtronik")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("switch")),
    );
}

#[test]
fn test_completions_bash() {
    luxtronik_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_config_path_honors_flag() {
    luxtronik_cmd()
        .args(["config", "path", "--config", "/tmp/somewhere/luxtronik.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/somewhere/luxtronik.toml"));
}

#[test]
fn test_config_show_defaults() {
    luxtronik_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 8889"));
}

// ── Snapshot errors ─────────────────────────────────────────────────

#[test]
fn test_missing_snapshot_flag_is_usage_error() {
    luxtronik_cmd()
        .args(["get", "parameters.ID_Ba_Hz_akt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No snapshot file given"));
}

#[test]
fn test_missing_snapshot_file_is_not_found() {
    luxtronik_cmd()
        .args(["--snapshot", "/tmp/luxtronik-cli-test-nonexistent/dump.json"])
        .args(["get", "parameters.ID_Ba_Hz_akt"])
        .assert()
        .code(4);
}

#[test]
fn test_garbage_snapshot_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "not json").unwrap();
    with_snapshot(&path)
        .args(["identity"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a valid controller dump"));
}

// ── Lookup ──────────────────────────────────────────────────────────

#[test]
fn test_get_plain_values() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "get", "parameters.ID_Ba_Hz_akt", "calculations.15"])
        .assert()
        .success()
        .stdout("Automatic\n4.5\n");
}

#[test]
fn test_get_json_includes_unit() {
    let (_dir, path) = fixture_copy();
    let output = with_snapshot(&path)
        .args(["-o", "json", "get", "calculations.ID_WEB_Temperatur_TA"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["value"], 4.5);
    assert_eq!(json[0]["unit"], "°C");
}

#[test]
fn test_get_absent_field_prints_dash() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "get", "parameters.ID_Does_Not_Exist"])
        .assert()
        .success()
        .stdout("-\n");
}

#[test]
fn test_get_malformed_identifier_is_usage_error() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["get", "ID_Ba_Hz_akt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid identifier"));
}

#[test]
fn test_fields_lists_table() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["fields", "calculations"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ID_WEB_SoftStand").and(predicate::str::contains("SWC311")),
        );
}

// ── Identity and features ───────────────────────────────────────────

#[test]
fn test_identity_plain_is_serial() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "identity"])
        .assert()
        .success()
        .stdout("2301-0ff\n");
}

#[test]
fn test_identity_table() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .arg("identity")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Alpha Innotec")
                .and(predicate::str::contains("SWC311"))
                .and(predicate::str::contains("V3.89.0"))
                .and(predicate::str::contains("Data age")),
        );
}

#[test]
fn test_devices_identifiers() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "devices"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "alpha innotec_swc311_2301-0ff_heating",
        ));
}

#[test]
fn test_features_json() {
    let (_dir, path) = fixture_copy();
    let output = with_snapshot(&path)
        .args(["-o", "json", "features"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["cooling"], true);
    assert_eq!(
        json["cooling_zones"],
        serde_json::json!(["parameters.ID_Einst_MK2Typ_akt"])
    );
    assert_eq!(
        json["cooling_target_field"],
        "parameters.ID_Sollwert_KuCft2_akt"
    );
    assert_eq!(json["cooling_target_value"], 20.0);
    assert_eq!(json["solar"], false);
}

// ── Writes ──────────────────────────────────────────────────────────

#[test]
fn test_set_persists_snapshot() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "set", "ID_Ba_Hz_akt", "Off"])
        .assert()
        .success()
        .stdout("Off\n");
    assert_eq!(saved_value(&path, "parameters", "ID_Ba_Hz_akt"), "Off");
}

#[test]
fn test_set_nan_keeps_snapshot_loadable() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["set", "ID_Sollwert_KuCft2_akt", "nan"])
        .assert()
        .success();
    assert_eq!(saved_value(&path, "parameters", "ID_Sollwert_KuCft2_akt"), "nan");

    with_snapshot(&path)
        .args(["-o", "plain", "get", "parameters.ID_Sollwert_KuCft2_akt"])
        .assert()
        .success()
        .stdout("nan
");
}

#[test]
fn test_set_unknown_parameter_fails() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["set", "ID_Nope", "1"])
        .assert()
        .code(5);
    assert_eq!(saved_value(&path, "parameters", "ID_Ba_Hz_akt"), "Automatic");
}

#[test]
fn test_set_calculation_is_rejected() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["set", "calculations.ID_WEB_Temperatur_TA", "10"])
        .assert()
        .code(5);
}

#[test]
fn test_switches_list_states() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "switches"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("heating=on")
                .and(predicate::str::contains("cooling=off"))
                .and(predicate::str::contains("remote_maintenance=on")),
        );
}

#[test]
fn test_switch_off_persists() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["-o", "plain", "switch", "domestic_water", "off"])
        .assert()
        .success()
        .stdout("off\n");
    assert_eq!(saved_value(&path, "parameters", "ID_Ba_Bw_akt"), "Off");
}

#[test]
fn test_unknown_switch_is_not_found() {
    let (_dir, path) = fixture_copy();
    with_snapshot(&path)
        .args(["switch", "sauna", "on"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("luxtronik switches"));
}
