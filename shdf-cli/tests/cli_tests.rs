//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the shdf-cli binary (found in target/debug when run via cargo test).
fn shdf_cli() -> Command {
    cargo_bin_cmd!("shdf-cli")
}

/// Path to shdf library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("shdf")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = shdf_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("conversion"));
}

#[test]
fn test_cli_version() {
    let mut cmd = shdf_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_convert_to_shdf() {
    let mut cmd = shdf_cli();
    let path = fixtures_dir().join("blink_wokwi.json");

    cmd.arg("convert").arg(path).arg("--to").arg("shdf");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"arduino uno\""))
        .stdout(predicate::str::contains("uno1.pin13"));
}

#[test]
fn test_cli_convert_to_wokwi() {
    let mut cmd = shdf_cli();
    let path = fixtures_dir().join("blink_shdf.json");

    cmd.arg("convert").arg(path).arg("--to").arg("wokwi");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("wokwi-arduino-uno"))
        .stdout(predicate::str::contains("uno1:13"));
}

#[test]
fn test_cli_convert_physical_mode() {
    let mut cmd = shdf_cli();
    let path = fixtures_dir().join("physical_wokwi.json");

    cmd.arg("convert")
        .arg(path)
        .arg("--to")
        .arg("shdf")
        .arg("--mode")
        .arg("physical");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("breadboard.10a"));
}

#[test]
fn test_cli_convert_writes_output_file() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let out = dir.path().join("converted.json");
    let mut cmd = shdf_cli();

    cmd.arg("convert")
        .arg(fixtures_dir().join("blink_wokwi.json"))
        .arg("--to")
        .arg("shdf")
        .arg("--output")
        .arg(&out);

    cmd.assert().success();
    let written = std::fs::read_to_string(&out).expect("Should have written output file");
    assert!(written.contains("\"components\""));
}

#[test]
fn test_cli_convert_missing_file() {
    let mut cmd = shdf_cli();

    cmd.arg("convert")
        .arg("/no/such/diagram.json")
        .arg("--to")
        .arg("shdf");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_validate_valid_document() {
    let mut cmd = shdf_cli();
    let path = fixtures_dir().join("blink_shdf.json");

    cmd.arg("validate").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_cli_validate_invalid_document_exits_2() {
    let mut cmd = shdf_cli();
    let path = fixtures_dir().join("invalid_shdf.json");

    cmd.arg("validate").arg(path);

    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("issue(s)"));
}

#[test]
fn test_cli_validate_json_format() {
    let mut cmd = shdf_cli();
    let path = fixtures_dir().join("invalid_shdf.json");

    cmd.arg("validate").arg(path).arg("--format").arg("json");

    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("\"valid\": false"));
}

#[test]
fn test_cli_types_lists_known_components() {
    let mut cmd = shdf_cli();

    cmd.arg("types");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("arduino uno"))
        .stdout(predicate::str::contains("wokwi-led"));
}

#[test]
fn test_cli_types_verbose_shows_pins() {
    let mut cmd = shdf_cli();

    cmd.arg("types").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pins:"))
        .stdout(predicate::str::contains("anode"));
}

#[test]
fn test_cli_types_with_catalog_dir() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    std::fs::write(
        dir.path().join("extra.json"),
        r#"[{"native_type": "wokwi-gas-sensor", "pins": [{"pin_name": "AOUT"}]}]"#,
    )
    .expect("Should write catalog");
    let mut cmd = shdf_cli();

    cmd.arg("types").arg("--catalog").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gas-sensor"));
}
