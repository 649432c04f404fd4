//! Native (Wokwi) diagram model.
//!
//! The native format is the vendor-specific hardware-diagram JSON:
//! `parts` with prefixed type names and free-form string attrs, and
//! `connections` serialized as 2..4-element arrays of
//! `[from, to, color, route]` with `id:pin` endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single part in a native diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WokwiPart {
    /// Native component type, e.g. "wokwi-arduino-uno".
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl WokwiPart {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            top: None,
            left: None,
            rotate: None,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn at(mut self, top: f64, left: f64) -> Self {
        self.top = Some(top);
        self.left = Some(left);
        self
    }
}

/// A wire in a native diagram.
///
/// The wire format is a 2..4-element array: endpoints, then an optional
/// color, then optional routing hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct WokwiConnection {
    pub from: String,
    pub to: String,
    pub color: Option<String>,
    pub route: Vec<String>,
}

impl WokwiConnection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            color: None,
            route: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn endpoints(&self) -> [&str; 2] {
        [&self.from, &self.to]
    }
}

impl TryFrom<Vec<Value>> for WokwiConnection {
    type Error = String;

    fn try_from(raw: Vec<Value>) -> Result<Self, Self::Error> {
        if raw.len() < 2 || raw.len() > 4 {
            return Err(format!(
                "connection must have 2 to 4 elements, got {}",
                raw.len()
            ));
        }
        let string_at = |index: usize| -> Result<String, String> {
            raw[index]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("connection element {index} must be a string"))
        };
        let from = string_at(0)?;
        let to = string_at(1)?;
        let color = match raw.get(2) {
            Some(value) => Some(
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or("connection color must be a string")?,
            ),
            None => None,
        };
        let route = match raw.get(3) {
            Some(value) => value
                .as_array()
                .ok_or("connection route must be an array")?
                .iter()
                .map(|hint| {
                    hint.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| "route hints must be strings".to_string())
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self { from, to, color, route })
    }
}

impl From<WokwiConnection> for Vec<Value> {
    fn from(conn: WokwiConnection) -> Self {
        if conn.color.is_none() && conn.route.is_empty() {
            return vec![conn.from.into(), conn.to.into()];
        }
        vec![
            conn.from.into(),
            conn.to.into(),
            conn.color.unwrap_or_else(|| "green".to_string()).into(),
            Value::Array(conn.route.into_iter().map(Value::from).collect()),
        ]
    }
}

/// A complete native diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WokwiDiagram {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(default)]
    pub parts: Vec<WokwiPart>,
    #[serde(default)]
    pub connections: Vec<WokwiConnection>,
}

fn default_version() -> u32 {
    1
}

impl Default for WokwiDiagram {
    fn default() -> Self {
        Self {
            version: 1,
            author: None,
            editor: None,
            parts: Vec::new(),
            connections: Vec::new(),
        }
    }
}

impl WokwiDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_part(&self, id: &str) -> Option<&WokwiPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_accepts_two_to_four_elements() {
        let short: WokwiConnection =
            serde_json::from_str(r#"["uno1:13", "led1:A"]"#).expect("Should parse pair");
        assert_eq!(short.from, "uno1:13");
        assert_eq!(short.color, None);

        let full: WokwiConnection =
            serde_json::from_str(r#"["uno1:13", "led1:A", "green", ["v10"]]"#)
                .expect("Should parse full wire");
        assert_eq!(full.color.as_deref(), Some("green"));
        assert_eq!(full.route, vec!["v10".to_string()]);
    }

    #[test]
    fn test_connection_rejects_bad_shapes() {
        assert!(serde_json::from_str::<WokwiConnection>(r#"["only-one"]"#).is_err());
        assert!(serde_json::from_str::<WokwiConnection>(r#"["a", "b", "c", [], "e"]"#).is_err());
        assert!(serde_json::from_str::<WokwiConnection>(r#"["a", 2]"#).is_err());
    }

    #[test]
    fn test_connection_serializes_as_full_wire() {
        let conn = WokwiConnection::new("uno1:13", "led1:A").with_color("green");
        let json = serde_json::to_string(&conn).expect("Should serialize");
        assert_eq!(json, r#"["uno1:13","led1:A","green",[]]"#);
    }

    #[test]
    fn test_diagram_round_trip() {
        let json = r#"{
            "version": 1,
            "author": "someone",
            "parts": [
                {"type": "wokwi-arduino-uno", "id": "uno1", "top": 200, "left": 20},
                {"type": "wokwi-led", "id": "led1", "attrs": {"color": "red"}}
            ],
            "connections": [
                ["uno1:13", "led1:A", "green", []],
                ["led1:C", "uno1:GND.1", "black", []]
            ]
        }"#;
        let diagram = WokwiDiagram::from_json(json).expect("Should parse diagram");
        assert_eq!(diagram.parts.len(), 2);
        assert_eq!(diagram.get_part("led1").map(|p| p.kind.as_str()), Some("wokwi-led"));

        let round = WokwiDiagram::from_json(&diagram.to_json().expect("Should serialize"))
            .expect("Should reparse");
        assert_eq!(round, diagram);
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let diagram = WokwiDiagram::from_json(r#"{"version": 1}"#).expect("Should parse");
        assert!(diagram.parts.is_empty());
        assert!(diagram.connections.is_empty());
    }
}
