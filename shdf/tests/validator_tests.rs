//! Integration tests for document validation.

use shdf::prelude::*;
use shdf::validator::Check;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn mappings() -> MappingSet {
    MappingSet::builtin().expect("Should build builtin mapping set")
}

#[test]
fn test_valid_fixture_has_no_findings() {
    let mappings = mappings();
    let report = ShdfCore::validate_file(&fixture_path("blink_shdf.json"), &mappings)
        .expect("Should read and parse fixture");

    assert!(
        report.is_valid(),
        "Valid fixture should have no findings: {:?}",
        report.errors
    );
}

#[test]
fn test_invalid_fixture_reports_every_stage() {
    let mappings = mappings();
    let report = ShdfCore::validate_file(&fixture_path("invalid_shdf.json"), &mappings)
        .expect("Should read and parse fixture");

    assert!(!report.is_valid());
    for check in [
        Check::Types,
        Check::Identifiers,
        Check::Pins,
        Check::Breadboard,
        Check::Properties,
    ] {
        assert!(
            report.errors.iter().any(|e| e.check == check),
            "Expected a {check:?} finding, got {:?}",
            report.errors
        );
    }
}

#[test]
fn test_findings_carry_json_paths() {
    let mappings = mappings();
    let report = ShdfCore::validate_file(&fixture_path("invalid_shdf.json"), &mappings)
        .expect("Should read and parse fixture");

    let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"components[1].id"), "duplicate id path: {paths:?}");
    assert!(paths.contains(&"components[1].type"), "unknown type path: {paths:?}");
    assert!(
        paths.contains(&"components[2].properties.value"),
        "resistor value path: {paths:?}"
    );
}

#[test]
fn test_converted_output_validates() {
    let mappings = mappings();
    let outcome = ShdfCore::convert_file(
        &fixture_path("blink_wokwi.json"),
        Direction::ToShdf,
        &mappings,
        ConvertOptions::default(),
    )
    .expect("Should convert fixture");

    let report = ShdfValidator::new(&mappings).validate_value(&outcome.output);
    assert!(
        report.is_valid(),
        "Converter output should validate cleanly: {:?}",
        report.errors
    );
}

#[test]
fn test_report_serializes_for_machine_consumers() {
    let mappings = mappings();
    let report = ShdfCore::validate_file(&fixture_path("invalid_shdf.json"), &mappings)
        .expect("Should read and parse fixture");

    let json = serde_json::to_value(&report).expect("Should serialize report");
    let first = &json["errors"][0];
    assert!(first["path"].is_string());
    assert!(first["message"].is_string());
    assert!(first["check"].is_string());
}
