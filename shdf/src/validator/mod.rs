//! SHDF document validation.
//!
//! Validation runs six independent stages over a raw JSON value and
//! collects every finding rather than stopping at the first. Stages
//! that need well-formed entries skip malformed ones (the structure
//! stage has already reported those) instead of aborting.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::convert::breadboard::{BoardPosition, MAX_COLUMN};
use crate::mapping::MappingSet;
use crate::schema::{Document, Endpoint, BREADBOARD_ID};

/// Which validation stage produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Structure,
    Types,
    Identifiers,
    Pins,
    Breadboard,
    Properties,
}

/// One validation finding, located by a JSON-pointer-like path such as
/// `components[0].properties.value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub check: Check,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The collected findings of one validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, check: Check, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            check,
        });
    }
}

/// Validates raw SHDF JSON against the structural and naming rules.
#[derive(Debug, Clone)]
pub struct ShdfValidator<'a> {
    mappings: &'a MappingSet,
}

impl<'a> ShdfValidator<'a> {
    pub fn new(mappings: &'a MappingSet) -> Self {
        Self { mappings }
    }

    /// Validate a JSON string. Fails only when the input is not JSON at
    /// all; everything else becomes report findings.
    pub fn validate_str(&self, json: &str) -> Result<ValidationReport, serde_json::Error> {
        Ok(self.validate_value(&serde_json::from_str(json)?))
    }

    /// Validate an already-typed document.
    pub fn validate(&self, document: &Document) -> ValidationReport {
        match serde_json::to_value(document) {
            Ok(value) => self.validate_value(&value),
            Err(err) => {
                let mut report = ValidationReport::default();
                report.push(Check::Structure, "$", format!("not serializable: {err}"));
                report
            }
        }
    }

    /// Run every stage over a raw JSON value and collect all findings.
    pub fn validate_value(&self, value: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        self.check_structure(value, &mut report);
        self.check_types(value, &mut report);
        self.check_identifiers(value, &mut report);
        self.check_pins(value, &mut report);
        self.check_breadboard(value, &mut report);
        self.check_properties(value, &mut report);
        report
    }

    fn check_structure(&self, value: &Value, report: &mut ValidationReport) {
        let Some(root) = value.as_object() else {
            report.push(Check::Structure, "$", "document must be a JSON object");
            return;
        };

        match root.get("components") {
            None => report.push(Check::Structure, "components", "missing required section"),
            Some(Value::Array(components)) => {
                if components.is_empty() {
                    report.push(Check::Structure, "components", "must not be empty");
                }
                for (i, component) in components.iter().enumerate() {
                    self.check_component_shape(i, component, report);
                }
            }
            Some(_) => report.push(Check::Structure, "components", "must be an array"),
        }

        match root.get("connections") {
            None => report.push(Check::Structure, "connections", "missing required section"),
            Some(Value::Array(connections)) => {
                for (i, connection) in connections.iter().enumerate() {
                    let path = format!("connections[{i}]");
                    match connection.as_array() {
                        Some(pair) if pair.len() == 2 => {
                            for (j, endpoint) in pair.iter().enumerate() {
                                if !endpoint.is_string() {
                                    report.push(
                                        Check::Structure,
                                        format!("{path}[{j}]"),
                                        "endpoint must be a string",
                                    );
                                }
                            }
                        }
                        Some(pair) => report.push(
                            Check::Structure,
                            path,
                            format!("must have exactly 2 endpoints, got {}", pair.len()),
                        ),
                        None => report.push(Check::Structure, path, "must be a 2-element array"),
                    }
                }
            }
            Some(_) => report.push(Check::Structure, "connections", "must be an array"),
        }
    }

    fn check_component_shape(&self, index: usize, component: &Value, report: &mut ValidationReport) {
        let path = format!("components[{index}]");
        let Some(fields) = component.as_object() else {
            report.push(Check::Structure, path, "must be an object");
            return;
        };
        match fields.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {}
            Some(_) => report.push(Check::Structure, format!("{path}.id"), "must not be empty"),
            None => report.push(
                Check::Structure,
                format!("{path}.id"),
                "missing required string field",
            ),
        }
        if fields.get("type").and_then(Value::as_str).is_none() {
            report.push(
                Check::Structure,
                format!("{path}.type"),
                "missing required string field",
            );
        }
    }

    fn check_types(&self, value: &Value, report: &mut ValidationReport) {
        for (i, component) in components(value) {
            let Some(kind) = component.get("type").and_then(Value::as_str) else {
                continue;
            };
            let resolved = self.mappings.resolve_type_alias(kind);
            if !self.mappings.is_canonical_type(&resolved) {
                report.push(
                    Check::Types,
                    format!("components[{i}].type"),
                    format!("unknown component type {kind:?}"),
                );
            }
        }
    }

    fn check_identifiers(&self, value: &Value, report: &mut ValidationReport) {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, component) in components(value) {
            let Some(id) = component.get("id").and_then(Value::as_str) else {
                continue;
            };
            if id.is_empty() {
                continue;
            }
            if let Some(first) = seen.get(id) {
                report.push(
                    Check::Identifiers,
                    format!("components[{i}].id"),
                    format!("duplicate id {id:?} (first declared at components[{first}])"),
                );
            } else {
                seen.insert(id, i);
            }
        }

        for (i, j, endpoint) in endpoints(value) {
            if let Endpoint::Pin { component, .. } = Endpoint::parse(endpoint) {
                if !seen.contains_key(component) && component != BREADBOARD_ID {
                    report.push(
                        Check::Identifiers,
                        format!("connections[{i}][{j}]"),
                        format!("references undeclared component {component:?}"),
                    );
                }
            }
        }
    }

    fn check_pins(&self, value: &Value, report: &mut ValidationReport) {
        let mut kinds: BTreeMap<&str, String> = BTreeMap::new();
        for (_, component) in components(value) {
            if let (Some(id), Some(kind)) = (
                component.get("id").and_then(Value::as_str),
                component.get("type").and_then(Value::as_str),
            ) {
                kinds.entry(id).or_insert_with(|| self.mappings.resolve_type_alias(kind));
            }
        }

        for (i, j, endpoint) in endpoints(value) {
            let Endpoint::Pin { component, pin } = Endpoint::parse(endpoint) else {
                continue;
            };
            let Some(kind) = kinds.get(component) else {
                continue;
            };
            let resolved = self.mappings.resolve_pin_alias(pin);
            let pattern = self
                .mappings
                .pin_pattern(kind)
                .unwrap_or_else(|| self.mappings.default_pin_pattern());
            if !pattern.is_match(&resolved) {
                report.push(
                    Check::Pins,
                    format!("connections[{i}][{j}]"),
                    format!("pin {pin:?} does not follow the naming convention for {kind:?}"),
                );
            }
        }
    }

    fn check_breadboard(&self, value: &Value, report: &mut ValidationReport) {
        for (i, j, endpoint) in endpoints(value) {
            let Endpoint::Board(raw) = Endpoint::parse(endpoint) else {
                continue;
            };
            let path = format!("connections[{i}][{j}]");
            let Some((_, pos)) = raw.split_once('.') else {
                report.push(Check::Breadboard, path, "breadboard endpoint has no position");
                continue;
            };
            match BoardPosition::parse_canonical(pos) {
                Some(position) if position.column_in_range() => {}
                Some(position) => report.push(
                    Check::Breadboard,
                    path,
                    format!(
                        "column {} out of range (1..={MAX_COLUMN})",
                        position.column()
                    ),
                ),
                None => report.push(
                    Check::Breadboard,
                    path,
                    format!("invalid breadboard position {pos:?}"),
                ),
            }
        }
    }

    fn check_properties(&self, value: &Value, report: &mut ValidationReport) {
        for (i, component) in components(value) {
            let Some(kind) = component.get("type").and_then(Value::as_str) else {
                continue;
            };
            if self.mappings.resolve_type_alias(kind) != "resistor" {
                continue;
            }
            let has_value = component
                .get("properties")
                .and_then(Value::as_object)
                .and_then(|props| props.get("value"))
                .map(|v| match v {
                    Value::String(s) => !s.trim().is_empty(),
                    Value::Number(_) => true,
                    _ => false,
                })
                .unwrap_or(false);
            if !has_value {
                report.push(
                    Check::Properties,
                    format!("components[{i}].properties.value"),
                    "resistor requires a non-empty \"value\" property",
                );
            }
        }
    }
}

/// Iterate well-formed component objects with their indexes.
fn components(value: &Value) -> impl Iterator<Item = (usize, &Value)> {
    value
        .get("components")
        .and_then(Value::as_array)
        .map(|c| c.as_slice())
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, component)| component.is_object())
}

/// Iterate string endpoints of well-formed connections as
/// `(connection index, endpoint index, endpoint)`.
fn endpoints(value: &Value) -> impl Iterator<Item = (usize, usize, &str)> {
    value
        .get("connections")
        .and_then(Value::as_array)
        .map(|c| c.as_slice())
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(i, connection)| {
            let pair = connection.as_array()?;
            if pair.len() != 2 {
                return None;
            }
            Some((i, pair))
        })
        .flat_map(|(i, pair)| {
            pair.iter()
                .enumerate()
                .filter_map(move |(j, endpoint)| Some((i, j, endpoint.as_str()?)))
        })
}
