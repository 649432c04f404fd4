//! Native diagram -> SHDF document conversion.

use std::collections::BTreeMap;

use super::breadboard::BoardPosition;
use super::{ConvertError, ConvertMode};
use crate::mapping::{MappingError, MappingSet};
use crate::schema::{Component, Connection, Document, Metadata, BREADBOARD_ID};
use crate::wokwi::{WokwiDiagram, WokwiPart};

/// Canonical type of the multi-digit display variant; the native format
/// expresses it as the plain 7-segment type with a `digits` attr.
pub(crate) const FOUR_DIGIT_DISPLAY: &str = "4-digit 7-segment display";
pub(crate) const SEVEN_SEGMENT_NATIVE: &str = "wokwi-7segment";

pub(crate) fn convert(
    mappings: &MappingSet,
    mode: ConvertMode,
    diagram: &WokwiDiagram,
) -> Result<Document, ConvertError> {
    // Pass 1: canonical type per part id. Connection endpoints resolve
    // component types through this map, never by guessing from the id.
    let mut kinds: BTreeMap<&str, String> = BTreeMap::new();
    for part in &diagram.parts {
        kinds.insert(part.id.as_str(), canonical_kind(mappings, part)?);
    }

    let mut document = Document::new();
    for part in &diagram.parts {
        let kind = kinds[part.id.as_str()].as_str();
        if kind == BREADBOARD_ID && mode == ConvertMode::Logical {
            tracing::debug!("dropping breadboard part {:?} in logical mode", part.id);
            continue;
        }
        document.add_component(convert_part(part, kind));
    }

    for conn in &diagram.connections {
        let from = convert_endpoint(mappings, mode, &kinds, &conn.from)?;
        let to = convert_endpoint(mappings, mode, &kinds, &conn.to)?;
        match (from, to) {
            (Some(from), Some(to)) => document.add_connection(Connection::new(from, to)),
            _ => tracing::debug!(
                "dropping breadboard connection [{:?}, {:?}] in logical mode",
                conn.from,
                conn.to
            ),
        }
    }

    if let Some(author) = &diagram.author {
        document.metadata = Some(Metadata {
            author: Some(author.clone()),
            ..Metadata::default()
        });
    }
    Ok(document)
}

fn canonical_kind(mappings: &MappingSet, part: &WokwiPart) -> Result<String, ConvertError> {
    if part.kind == SEVEN_SEGMENT_NATIVE && part.attrs.get("digits").map(String::as_str) == Some("4")
    {
        return Ok(FOUR_DIGIT_DISPLAY.to_string());
    }
    mappings
        .native_to_canonical_type(&part.kind)
        .map_err(|source| ConvertError::Mapping {
            id: part.id.clone(),
            source,
        })
}

fn convert_part(part: &WokwiPart, kind: &str) -> Component {
    let mut component = Component::new(&part.id, kind);
    for (key, value) in &part.attrs {
        let converted = match key.as_str() {
            // The digits attr is folded into the 4-digit canonical type.
            "digits" if kind == FOUR_DIGIT_DISPLAY => continue,
            "color" => value.to_lowercase(),
            "value" if kind == "resistor" => normalize_resistor_value(value),
            _ => {
                tracing::debug!("carrying attr {key:?} of {:?} verbatim", part.id);
                value.clone()
            }
        };
        component.properties.insert(key.clone(), converted.into());
    }
    component
}

/// Resistor values gain a unit suffix on the canonical side.
fn normalize_resistor_value(value: &str) -> String {
    if value.ends_with("ohm") || value.ends_with('Ω') {
        value.to_string()
    } else {
        format!("{value} ohm")
    }
}

/// Convert one `id:pin` endpoint. Returns `None` for breadboard
/// endpoints dropped in logical mode.
fn convert_endpoint(
    mappings: &MappingSet,
    mode: ConvertMode,
    kinds: &BTreeMap<&str, String>,
    endpoint: &str,
) -> Result<Option<String>, ConvertError> {
    let Some((id, pin)) = endpoint.split_once(':') else {
        // Bare endpoints (reserved literals) pass through unchanged.
        return Ok(Some(endpoint.to_string()));
    };

    let Some(kind) = kinds.get(id) else {
        return Err(ConvertError::UnknownComponent {
            endpoint: endpoint.to_string(),
            id: id.to_string(),
        });
    };

    if kind.as_str() == BREADBOARD_ID {
        if mode == ConvertMode::Logical {
            return Ok(None);
        }
        let position = BoardPosition::parse_native(pin).ok_or_else(|| {
            ConvertError::BadBreadboardPosition {
                endpoint: endpoint.to_string(),
            }
        })?;
        return Ok(Some(format!("{BREADBOARD_ID}.{}", position.to_canonical())));
    }

    let canonical_pin = match mappings.native_to_canonical_pin(kind, pin) {
        Ok(pin) => pin,
        // Fallback-typed components have no pin table; best effort keeps
        // conversion total by passing the alias-resolved pin through.
        Err(MappingError::UnknownPinMapping { .. }) => mappings.resolve_pin_alias(pin),
        Err(source) => {
            return Err(ConvertError::Mapping {
                id: id.to_string(),
                source,
            })
        }
    };
    Ok(Some(format!("{id}.{canonical_pin}")))
}
