//! Convert a native diagram to SHDF and print both forms.
//!
//! Run with: cargo run --example convert_diagram

use shdf::convert::{ConvertMode, DiagramConverter};
use shdf::mapping::MappingSet;
use shdf::wokwi::WokwiDiagram;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let diagram = WokwiDiagram::from_json(
        r#"{
            "version": 1,
            "author": "example",
            "parts": [
                {"type": "wokwi-arduino-uno", "id": "uno1", "top": 200, "left": 20},
                {"type": "wokwi-led", "id": "led1", "attrs": {"color": "red"}},
                {"type": "wokwi-resistor", "id": "r1", "attrs": {"value": "220"}}
            ],
            "connections": [
                ["uno1:13", "r1:1", "green", []],
                ["r1:2", "led1:A", "green", []],
                ["led1:C", "uno1:GND.1", "black", []]
            ]
        }"#,
    )?;

    let mappings = MappingSet::builtin()?;
    let converter = DiagramConverter::new(&mappings).with_mode(ConvertMode::Logical);

    let document = converter.to_shdf(&diagram)?;
    println!("SHDF document:\n{}\n", document.to_json()?);

    let back = converter.to_native(&document)?;
    println!("Back to native:\n{}", back.to_json()?);

    Ok(())
}
