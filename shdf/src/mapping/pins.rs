//! Per-component-type pin-name translation.
//!
//! Pin meaning is component-specific: native pin "A" is the anode of an
//! LED but segment "a" of a 7-segment display, so every table is scoped by
//! canonical component type.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

use super::alias::AliasResolver;
use super::MappingError;
use crate::catalog::PinDescriptor;

/// Pattern accepted for pins of types without a registered pin table.
const DEFAULT_PIN_PATTERN: &str = r"^[a-z0-9_.+-]+$";

/// One row of a per-type pin-mapping table.
#[derive(Debug, Clone, Deserialize)]
pub struct PinMappingEntry {
    pub native: String,
    pub canonical: String,
}

#[derive(Debug, Clone, Default)]
struct TypePins {
    /// native pin (lower-cased) -> canonical pin
    to_canonical: BTreeMap<String, String>,
    /// canonical pin -> native pin (original spelling)
    to_native: BTreeMap<String, String>,
}

impl TypePins {
    fn register(&mut self, native: &str, canonical: &str) {
        let key = native.to_lowercase();
        let canonical = canonical.to_lowercase();
        if self.to_canonical.contains_key(&key) {
            return;
        }
        self.to_canonical.insert(key, canonical.clone());
        self.to_native.entry(canonical).or_insert_with(|| native.to_string());
    }
}

/// Bidirectional pin mapping, scoped per canonical component type.
///
/// A pin with no registered mapping on a known type passes through
/// unchanged (many pins spell the same in both formats, e.g. `vcc`).
/// Only an unrecognized component type is an error.
#[derive(Debug, Clone)]
pub struct PinMapper {
    tables: BTreeMap<String, TypePins>,
    patterns: BTreeMap<String, Regex>,
    default_pattern: Regex,
}

impl PinMapper {
    /// Build from the base pin-mapping tables, keyed by canonical type.
    pub fn new(
        base: &BTreeMap<String, Vec<PinMappingEntry>>,
    ) -> Result<Self, regex::Error> {
        let mut tables: BTreeMap<String, TypePins> = BTreeMap::new();
        for (canonical_type, entries) in base {
            let table = tables.entry(canonical_type.to_lowercase()).or_default();
            for entry in entries {
                table.register(&entry.native, &entry.canonical);
            }
        }
        Ok(Self {
            tables,
            patterns: BTreeMap::new(),
            default_pattern: Regex::new(&format!("(?i){DEFAULT_PIN_PATTERN}"))?,
        })
    }

    /// Seed pin entries for a type from a module descriptor.
    ///
    /// Descriptor pins never replace base-table entries; pins already
    /// registered for the type keep their built-in mapping.
    pub fn seed_descriptor(&mut self, canonical_type: &str, pins: &[PinDescriptor]) {
        let table = self.tables.entry(canonical_type.to_lowercase()).or_default();
        for pin in pins {
            if pin.pin_name.trim().is_empty() {
                tracing::debug!("skipping unnamed descriptor pin for {canonical_type:?}");
                continue;
            }
            table.register(&pin.pin_name, &normalize_descriptor_pin(&pin.pin_name));
        }
    }

    /// Compile the per-type pin-name patterns from the registered tables.
    ///
    /// Called once after all seeding; patterns are anchored alternations of
    /// the canonical pin names, matched case-insensitively.
    pub fn compile_patterns(&mut self) -> Result<(), regex::Error> {
        for (canonical_type, table) in &self.tables {
            if table.to_native.is_empty() {
                continue;
            }
            let alternatives: Vec<String> =
                table.to_native.keys().map(|p| regex::escape(p)).collect();
            let pattern = format!("(?i)^(?:{})$", alternatives.join("|"));
            self.patterns.insert(canonical_type.clone(), Regex::new(&pattern)?);
        }
        Ok(())
    }

    /// Translate a native pin to its canonical name for the given type.
    pub fn native_to_canonical(
        &self,
        aliases: &AliasResolver,
        canonical_type: &str,
        native_pin: &str,
    ) -> Result<String, MappingError> {
        let (table, _) = self.table_for(aliases, canonical_type, native_pin)?;
        let pin = aliases.resolve_pin(native_pin);
        Ok(table.to_canonical.get(&pin).cloned().unwrap_or(pin))
    }

    /// Translate a canonical pin back to its native spelling for the type.
    pub fn canonical_to_native(
        &self,
        aliases: &AliasResolver,
        canonical_type: &str,
        canonical_pin: &str,
    ) -> Result<String, MappingError> {
        let (table, _) = self.table_for(aliases, canonical_type, canonical_pin)?;
        let pin = aliases.resolve_pin(canonical_pin);
        Ok(table.to_native.get(&pin).cloned().unwrap_or(pin))
    }

    fn table_for(
        &self,
        aliases: &AliasResolver,
        canonical_type: &str,
        pin: &str,
    ) -> Result<(&TypePins, String), MappingError> {
        let kind = aliases.resolve_type(canonical_type);
        match self.tables.get(&kind) {
            Some(table) => Ok((table, kind)),
            None => Err(MappingError::UnknownPinMapping {
                kind,
                pin: pin.to_string(),
            }),
        }
    }

    /// Whether a pin table is registered for this (already alias-resolved)
    /// canonical type.
    pub fn has_type(&self, canonical_type: &str) -> bool {
        self.tables.contains_key(canonical_type)
    }

    /// Naming pattern for pins of this canonical type, if one was compiled.
    pub fn pattern_for(&self, canonical_type: &str) -> Option<&Regex> {
        self.patterns.get(canonical_type)
    }

    /// Pattern applied to types without a registered pin table.
    pub fn default_pattern(&self) -> &Regex {
        &self.default_pattern
    }

    /// Canonical pin names registered for a type, in table order.
    pub fn pins_for(&self, canonical_type: &str) -> Vec<&str> {
        self.tables
            .get(canonical_type)
            .map(|t| t.to_native.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Deterministic canonical name for a descriptor-supplied pin.
///
/// All-digit pins gain a `pin` prefix (`13` -> `pin13`); dotted pins are
/// normalized segment by segment (`1.l` -> `pin1.l`); everything else is
/// lower-cased.
fn normalize_descriptor_pin(pin: &str) -> String {
    if pin.chars().all(|c| c.is_ascii_digit()) && !pin.is_empty() {
        return format!("pin{pin}");
    }
    if pin.contains('.') {
        return pin
            .split('.')
            .map(|segment| {
                if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                    format!("pin{segment}")
                } else {
                    segment.to_lowercase()
                }
            })
            .collect::<Vec<_>>()
            .join(".");
    }
    pin.to_lowercase()
}
