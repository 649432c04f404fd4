//! SHDF document model.
//!
//! The Standardized Hardware Description Format is the vendor-neutral
//! interchange representation: components with canonical type names,
//! connections as endpoint pairs, optional free-form metadata.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved endpoint literal for prototyping-board positions.
pub const BREADBOARD_ID: &str = "breadboard";

/// Property value on a component.
///
/// Documents produced by hand or by language models mix value shapes
/// freely, so properties accept any JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way the native format stores attributes
    /// (everything is a string there).
    pub fn to_display_string(&self) -> String {
        match self {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Number(n) => n.to_string(),
            PropertyValue::Boolean(b) => b.to_string(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// A single hardware component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Opaque identifier, unique within the document.
    pub id: String,
    /// Canonical component type, e.g. "arduino uno" or "led".
    #[serde(rename = "type")]
    pub kind: String,
    /// Open key-value map. Some keys are required per type (a resistor
    /// must carry "value").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// String form of a property, if present.
    pub fn property_str(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(|v| v.to_display_string())
    }
}

/// A wire between two endpoints; serializes as a 2-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection(pub String, pub String);

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self(from.into(), to.into())
    }

    pub fn endpoints(&self) -> [&str; 2] {
        [&self.0, &self.1]
    }
}

/// Parsed form of a connection endpoint string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `id.pin` reference to a declared component.
    Pin { component: &'a str, pin: &'a str },
    /// Reserved breadboard-position literal (the full endpoint string).
    Board(&'a str),
    /// Bare token with no pin separator; carried through unchanged.
    Bare(&'a str),
}

impl<'a> Endpoint<'a> {
    /// Split at the first `.`; the reserved board literal is recognized
    /// by its id part, never by substring.
    pub fn parse(raw: &'a str) -> Endpoint<'a> {
        match raw.split_once('.') {
            Some((id, _)) if id == BREADBOARD_ID => Endpoint::Board(raw),
            Some((component, pin)) => Endpoint::Pin { component, pin },
            None if raw == BREADBOARD_ID => Endpoint::Board(raw),
            None => Endpoint::Bare(raw),
        }
    }
}

/// Optional descriptive fields on a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.created.is_none()
            && self.modified.is_none()
    }
}

/// A complete SHDF document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    pub fn get_component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
