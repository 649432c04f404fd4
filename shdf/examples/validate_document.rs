//! Validate an SHDF document and print every finding.
//!
//! Run with: cargo run --example validate_document

use shdf::mapping::MappingSet;
use shdf::validator::ShdfValidator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = r#"{
        "components": [
            {"id": "uno1", "type": "arduino uno"},
            {"id": "led1", "type": "led"},
            {"id": "r1", "type": "resistor"}
        ],
        "connections": [
            ["uno1.pin13", "r1.pin1"],
            ["r1.pin2", "led1.anode"],
            ["led1.cathode", "ghost1.gnd"]
        ]
    }"#;

    let mappings = MappingSet::builtin()?;
    let report = ShdfValidator::new(&mappings).validate_str(document)?;

    if report.is_valid() {
        println!("document is valid");
    } else {
        println!("{} finding(s):", report.errors.len());
        for error in &report.errors {
            println!("  {error}");
        }
    }

    Ok(())
}
