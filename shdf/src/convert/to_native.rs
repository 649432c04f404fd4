//! SHDF document -> native diagram conversion.
//!
//! Besides mapping types and pins back to their native spellings, this
//! direction synthesizes the presentation data the native format needs:
//! part positions, rotations, and wire colors.

use std::collections::BTreeMap;

use super::breadboard::BoardPosition;
use super::to_shdf::{FOUR_DIGIT_DISPLAY, SEVEN_SEGMENT_NATIVE};
use super::{ConvertError, ConvertMode};
use crate::mapping::{MappingError, MappingSet};
use crate::schema::{Component, Document, Endpoint, BREADBOARD_ID};
use crate::wokwi::{WokwiConnection, WokwiDiagram, WokwiPart};

/// Author stamped on generated diagrams when the document carries none.
const DEFAULT_AUTHOR: &str = "shdf-converter";
const EDITOR_STAMP: &str = "shdf";

/// Palette for wires that are neither power nor LED polarity.
const WIRE_PALETTE: [&str; 5] = ["blue", "green", "yellow", "orange", "purple"];

pub(crate) fn convert(
    mappings: &MappingSet,
    mode: ConvertMode,
    document: &Document,
) -> Result<WokwiDiagram, ConvertError> {
    // Canonical (alias-resolved) type per component id.
    let mut kinds: BTreeMap<&str, String> = BTreeMap::new();
    for component in &document.components {
        kinds.insert(component.id.as_str(), mappings.resolve_type_alias(&component.kind));
    }
    // Native board endpoints carry the id of the first declared board.
    let board_id = document
        .components
        .iter()
        .find(|c| kinds[c.id.as_str()] == BREADBOARD_ID)
        .map(|c| c.id.as_str())
        .unwrap_or(BREADBOARD_ID);

    let mut diagram = WokwiDiagram::new();
    diagram.author = Some(
        document
            .metadata
            .as_ref()
            .and_then(|m| m.author.clone())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
    );
    diagram.editor = Some(EDITOR_STAMP.to_string());

    let mut instance_counts: BTreeMap<String, usize> = BTreeMap::new();
    for component in &document.components {
        let kind = kinds[component.id.as_str()].as_str();
        let native_type =
            mappings
                .canonical_to_native_type(kind)
                .map_err(|source| ConvertError::Mapping {
                    id: component.id.clone(),
                    source,
                })?;

        let instance = instance_counts.entry(native_type.clone()).or_insert(0);
        let mut part = WokwiPart::new(&component.id, &native_type);
        place_part(&mut part, mode, *instance);
        *instance += 1;

        if kind == FOUR_DIGIT_DISPLAY && native_type == SEVEN_SEGMENT_NATIVE {
            part.attrs.insert("digits".to_string(), "4".to_string());
        }
        convert_properties(component, kind, &mut part)?;
        diagram.parts.push(part);
    }

    for connection in &document.connections {
        let from = convert_endpoint(mappings, &kinds, board_id, &connection.0)?;
        let to = convert_endpoint(mappings, &kinds, board_id, &connection.1)?;
        let color = wire_color(&connection.0, &connection.1);
        diagram
            .connections
            .push(WokwiConnection::new(from, to).with_color(color));
    }

    Ok(diagram)
}

fn convert_properties(
    component: &Component,
    kind: &str,
    part: &mut WokwiPart,
) -> Result<(), ConvertError> {
    for (key, value) in &component.properties {
        let rendered = value.to_display_string();
        let converted = match key.as_str() {
            "value" if kind == "resistor" => {
                parse_resistor_value(&rendered).ok_or_else(|| ConvertError::BadPropertyValue {
                    id: component.id.clone(),
                    field: key.clone(),
                    value: rendered.clone(),
                })?
            }
            "color" => rendered.to_lowercase(),
            _ => {
                tracing::debug!("carrying property {key:?} of {:?} verbatim", component.id);
                rendered
            }
        };
        part.attrs.insert(key.clone(), converted);
    }
    Ok(())
}

/// Reduce a canonical resistor value to the bare number the native
/// format stores: strip the unit suffix, expand a trailing `k` by 1000.
fn parse_resistor_value(value: &str) -> Option<String> {
    let mut bare = value.trim();
    for suffix in ["ohm", "Ω"] {
        if let Some(stripped) = bare.strip_suffix(suffix) {
            bare = stripped.trim();
            break;
        }
    }
    let expanded = match bare.strip_suffix(['k', 'K']) {
        Some(prefix) => format!("{}000", prefix.trim()),
        None => bare.to_string(),
    };
    if expanded.is_empty() || !expanded.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(expanded)
}

/// Deterministic default placement per native type, with a fixed offset
/// per extra instance of the same type.
fn place_part(part: &mut WokwiPart, mode: ConvertMode, instance: usize) {
    let i = instance as f64;
    match part.kind.as_str() {
        "wokwi-arduino-uno" | "wokwi-arduino-mega" | "wokwi-arduino-nano" => {
            part.top = Some(200.0);
            part.left = Some(20.0);
        }
        "wokwi-breadboard" | "wokwi-breadboard-half" => {
            part.top = Some(0.0);
            part.left = Some(100.0);
        }
        "wokwi-resistor" => {
            part.top = Some(100.0);
            part.left = Some(150.0 + i * 50.0);
            part.rotate = Some(90);
        }
        "wokwi-led" => {
            part.top = Some(50.0);
            part.left = Some(150.0 + i * 50.0);
        }
        "wokwi-pushbutton" => {
            part.top = Some(150.0);
            part.left = Some(150.0 + i * 50.0);
            part.rotate = Some(90);
        }
        _ => match mode {
            ConvertMode::Logical => {
                part.top = Some(100.0);
                part.left = Some(200.0 + i * 80.0);
            }
            ConvertMode::Physical => {
                part.top = Some(50.0 + i * 30.0);
                part.left = Some(150.0 + i * 40.0);
            }
        },
    }
}

fn convert_endpoint(
    mappings: &MappingSet,
    kinds: &BTreeMap<&str, String>,
    board_id: &str,
    endpoint: &str,
) -> Result<String, ConvertError> {
    match Endpoint::parse(endpoint) {
        Endpoint::Bare(raw) => Ok(raw.to_string()),
        Endpoint::Board(raw) => {
            let Some((_, pos)) = raw.split_once('.') else {
                return Ok(raw.to_string());
            };
            let position = BoardPosition::parse_canonical(pos).ok_or_else(|| {
                ConvertError::BadBreadboardPosition {
                    endpoint: endpoint.to_string(),
                }
            })?;
            Ok(format!("{board_id}:{}", position.to_native()))
        }
        Endpoint::Pin { component, pin } => {
            let Some(kind) = kinds.get(component) else {
                return Err(ConvertError::UnknownComponent {
                    endpoint: endpoint.to_string(),
                    id: component.to_string(),
                });
            };
            let native_pin = match mappings.canonical_to_native_pin(kind, pin) {
                Ok(pin) => pin,
                Err(MappingError::UnknownPinMapping { .. }) => mappings.resolve_pin_alias(pin),
                Err(source) => {
                    return Err(ConvertError::Mapping {
                        id: component.to_string(),
                        source,
                    })
                }
            };
            Ok(format!("{component}:{native_pin}"))
        }
    }
}

/// Wire color selection: power pins get conventional colors, everything
/// else a deterministic hash of the endpoint pair over a fixed palette.
fn wire_color(from: &str, to: &str) -> String {
    let points = format!("{from}{to}").to_lowercase();
    if points.contains("gnd") {
        return "black".to_string();
    }
    if points.contains("5v") || points.contains("3.3v") || points.contains("vcc") {
        return "red".to_string();
    }
    if points.contains("anode") || points.contains("cathode") {
        return "green".to_string();
    }
    let digest = md5::compute(points.as_bytes());
    // Big-endian modular reduction of the 128-bit digest.
    let index = digest
        .0
        .iter()
        .fold(0usize, |acc, byte| (acc * 256 + *byte as usize) % WIRE_PALETTE.len());
    WIRE_PALETTE[index].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::DiagramConverter;
    use crate::schema::Connection;

    fn mappings() -> MappingSet {
        MappingSet::builtin().expect("Should build builtin mapping set")
    }

    fn blink_document() -> Document {
        let mut document = Document::new();
        document.add_component(Component::new("uno1", "arduino uno"));
        document.add_component(Component::new("led1", "led").with_property("color", "red"));
        document
            .add_component(Component::new("r1", "resistor").with_property("value", "220 ohm"));
        document.add_connection(Connection::new("uno1.pin13", "r1.pin1"));
        document.add_connection(Connection::new("r1.pin2", "led1.anode"));
        document.add_connection(Connection::new("led1.cathode", "uno1.gnd1"));
        document
    }

    #[test]
    fn test_blink_conversion() {
        let mappings = mappings();
        let diagram = DiagramConverter::new(&mappings)
            .to_native(&blink_document())
            .expect("Should convert");

        assert_eq!(diagram.version, 1);
        assert_eq!(diagram.author.as_deref(), Some(DEFAULT_AUTHOR));
        assert_eq!(diagram.parts[0].kind, "wokwi-arduino-uno");
        assert_eq!(diagram.parts[2].attrs.get("value").map(String::as_str), Some("220"));
        assert_eq!(diagram.parts[2].rotate, Some(90));

        assert_eq!(diagram.connections[0].from, "uno1:13");
        assert_eq!(diagram.connections[0].to, "r1:1");
        assert_eq!(diagram.connections[2].from, "led1:C");
        assert_eq!(diagram.connections[2].to, "uno1:GND.1");
        assert_eq!(diagram.connections[2].color.as_deref(), Some("black"));
    }

    #[test]
    fn test_metadata_author_carries_over() {
        let mappings = mappings();
        let mut document = blink_document();
        document.metadata = Some(crate::schema::Metadata {
            author: Some("someone".to_string()),
            ..Default::default()
        });
        let diagram = DiagramConverter::new(&mappings).to_native(&document).expect("converts");
        assert_eq!(diagram.author.as_deref(), Some("someone"));
    }

    #[test]
    fn test_resistor_value_forms() {
        assert_eq!(parse_resistor_value("220 ohm"), Some("220".to_string()));
        assert_eq!(parse_resistor_value("220"), Some("220".to_string()));
        assert_eq!(parse_resistor_value("1k"), Some("1000".to_string()));
        assert_eq!(parse_resistor_value("10k ohm"), Some("10000".to_string()));
        assert_eq!(parse_resistor_value("470Ω"), Some("470".to_string()));
        assert_eq!(parse_resistor_value("4.7k"), None);
        assert_eq!(parse_resistor_value("many"), None);
    }

    #[test]
    fn test_bad_resistor_value_is_an_error() {
        let mappings = mappings();
        let mut document = Document::new();
        document.add_component(Component::new("r1", "resistor").with_property("value", "lots"));

        let err = DiagramConverter::new(&mappings).to_native(&document).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::BadPropertyValue { ref id, ref field, .. }
                if id == "r1" && field == "value"
        ));
    }

    #[test]
    fn test_four_digit_display_regains_digits_attr() {
        let mappings = mappings();
        let mut document = Document::new();
        document.add_component(Component::new("disp1", "4-digit 7-segment display"));
        document.add_connection(Connection::new("disp1.dig1", "disp1.a"));

        let diagram = DiagramConverter::new(&mappings).to_native(&document).expect("converts");
        assert_eq!(diagram.parts[0].kind, SEVEN_SEGMENT_NATIVE);
        assert_eq!(diagram.parts[0].attrs.get("digits").map(String::as_str), Some("4"));
        assert_eq!(diagram.connections[0].from, "disp1:DIG1");
    }

    #[test]
    fn test_breadboard_endpoints_use_declared_board_id() {
        let mappings = mappings();
        let mut document = Document::new();
        document.add_component(Component::new("bb1", "breadboard"));
        document.add_component(Component::new("led1", "led"));
        document.add_connection(Connection::new("led1.anode", "breadboard.10a"));
        document.add_connection(Connection::new("breadboard.1tn", "breadboard.30tn"));

        let diagram = DiagramConverter::new(&mappings)
            .with_mode(ConvertMode::Physical)
            .to_native(&document)
            .expect("converts");

        assert_eq!(diagram.connections[0].to, "bb1:10t.a");
        assert_eq!(diagram.connections[1].from, "bb1:tn.1");
        assert_eq!(diagram.connections[1].to, "bb1:tn.30");
    }

    #[test]
    fn test_type_aliases_accepted_on_the_way_in() {
        let mappings = mappings();
        let mut document = Document::new();
        document.add_component(Component::new("b1", "Push Button"));
        let diagram = DiagramConverter::new(&mappings).to_native(&document).expect("converts");
        assert_eq!(diagram.parts[0].kind, "wokwi-pushbutton");
    }

    #[test]
    fn test_same_type_instances_are_offset() {
        let mappings = mappings();
        let mut document = Document::new();
        document.add_component(Component::new("led1", "led"));
        document.add_component(Component::new("led2", "led"));
        let diagram = DiagramConverter::new(&mappings).to_native(&document).expect("converts");

        assert_eq!(diagram.parts[0].left, Some(150.0));
        assert_eq!(diagram.parts[1].left, Some(200.0));
        assert_eq!(diagram.parts[0].top, diagram.parts[1].top);
    }

    #[test]
    fn test_wire_color_is_deterministic() {
        let first = wire_color("a.sig", "b.sig");
        assert_eq!(first, wire_color("a.sig", "b.sig"));
        assert!(WIRE_PALETTE.contains(&first.as_str()));
        assert_eq!(wire_color("led1.anode", "r1.pin2"), "green");
        assert_eq!(wire_color("uno1.5v", "pot1.vcc"), "red");
    }

    #[test]
    fn test_round_trip_through_native() {
        let mappings = mappings();
        let converter = DiagramConverter::new(&mappings);
        let document = blink_document();

        let diagram = converter.to_native(&document).expect("Should convert to native");
        let back = converter.to_shdf(&diagram).expect("Should convert back");

        assert_eq!(back.components.len(), document.components.len());
        assert_eq!(back.connections, document.connections);
        for (a, b) in back.components.iter().zip(&document.components) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.property_str("value"), b.property_str("value"));
        }
    }
}
