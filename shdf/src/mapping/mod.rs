//! Mapping tables between the native diagram format and SHDF.
//!
//! All tables live in externally editable JSON data files embedded at
//! build time, optionally extended by a module descriptor catalog. A
//! [`MappingSet`] is built once at startup and is immutable afterwards;
//! it is `Send + Sync` and is passed explicitly to the converter and
//! validator rather than living in global state.

pub mod alias;
pub mod pins;
pub mod types;

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::catalog::{CatalogError, ModuleCatalog};
pub use alias::AliasResolver;
pub use pins::{PinMapper, PinMappingEntry};
pub use types::{TypeMapper, TypeMappingEntry, NATIVE_PREFIX};

const EMBEDDED_TYPE_MAPPINGS: &str = include_str!("../data/type_mappings.json");
const EMBEDDED_PIN_MAPPINGS: &str = include_str!("../data/pin_mappings.json");
const EMBEDDED_TYPE_ALIASES: &str = include_str!("../data/type_aliases.json");
const EMBEDDED_PIN_ALIASES: &str = include_str!("../data/pin_aliases.json");

/// Mapping failures surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// No mapping exists and the fallback rule could not produce a value.
    #[error("unknown component type: {0:?}")]
    UnknownComponentType(String),
    /// The component type itself is unrecognized when mapping a pin.
    #[error("unknown component type {kind:?} while mapping pin {pin:?}")]
    UnknownPinMapping { kind: String, pin: String },
}

/// The immutable set of alias, type, and pin tables used by every
/// conversion and validation call.
#[derive(Debug, Clone)]
pub struct MappingSet {
    aliases: AliasResolver,
    types: TypeMapper,
    pins: PinMapper,
    canonical_types: BTreeSet<String>,
}

impl MappingSet {
    /// Build from the embedded base tables plus the embedded default
    /// module catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_catalog(ModuleCatalog::embedded()?)
    }

    /// Build from the embedded base tables plus an external catalog.
    ///
    /// External descriptors take precedence over embedded ones for the
    /// same native type, but built-in base-table entries are never
    /// overridden by any descriptor.
    pub fn with_catalog(catalog: &ModuleCatalog) -> Result<Self, CatalogError> {
        let mut merged = catalog.clone();
        merged.merge(ModuleCatalog::embedded()?);
        Self::from_catalog(merged)
    }

    fn from_catalog(catalog: ModuleCatalog) -> Result<Self, CatalogError> {
        let type_entries: Vec<TypeMappingEntry> = serde_json::from_str(EMBEDDED_TYPE_MAPPINGS)?;
        let pin_entries: BTreeMap<String, Vec<PinMappingEntry>> =
            serde_json::from_str(EMBEDDED_PIN_MAPPINGS)?;
        let type_aliases: BTreeMap<String, String> = serde_json::from_str(EMBEDDED_TYPE_ALIASES)?;
        let pin_aliases: BTreeMap<String, String> = serde_json::from_str(EMBEDDED_PIN_ALIASES)?;

        let aliases = AliasResolver::new(type_aliases, pin_aliases);
        let mut types = TypeMapper::new(&type_entries);
        let mut pins = PinMapper::new(&pin_entries)?;

        for descriptor in catalog.descriptors() {
            let native = descriptor.native_type.to_lowercase();
            let canonical = match types.registered_canonical(&native) {
                Some(existing) => existing.to_string(),
                None => match types::fallback_canonical(&native) {
                    Ok(canonical) => canonical,
                    Err(_) => {
                        tracing::warn!(
                            "skipping descriptor {:?}: no canonical form derivable",
                            descriptor.native_type
                        );
                        continue;
                    }
                },
            };
            types.register(&native, &canonical);
            pins.seed_descriptor(&canonical, &descriptor.pins);
        }

        pins.compile_patterns()?;
        let canonical_types = types.canonical_types().map(str::to_string).collect();

        Ok(Self {
            aliases,
            types,
            pins,
            canonical_types,
        })
    }

    /// Canonical spelling for a component type (lower-cased, alias-resolved).
    pub fn resolve_type_alias(&self, value: &str) -> String {
        self.aliases.resolve_type(value)
    }

    /// Canonical spelling for a pin name (lower-cased, alias-resolved).
    pub fn resolve_pin_alias(&self, value: &str) -> String {
        self.aliases.resolve_pin(value)
    }

    /// Translate a native component type to canonical form.
    pub fn native_to_canonical_type(&self, native: &str) -> Result<String, MappingError> {
        self.types.native_to_canonical(&self.aliases, native)
    }

    /// Translate a canonical component type to its primary native form.
    pub fn canonical_to_native_type(&self, canonical: &str) -> Result<String, MappingError> {
        self.types.canonical_to_native(&self.aliases, canonical)
    }

    /// Translate a native pin name to canonical form, scoped per type.
    pub fn native_to_canonical_pin(
        &self,
        canonical_type: &str,
        native_pin: &str,
    ) -> Result<String, MappingError> {
        self.pins.native_to_canonical(&self.aliases, canonical_type, native_pin)
    }

    /// Translate a canonical pin name to native form, scoped per type.
    pub fn canonical_to_native_pin(
        &self,
        canonical_type: &str,
        canonical_pin: &str,
    ) -> Result<String, MappingError> {
        self.pins.canonical_to_native(&self.aliases, canonical_type, canonical_pin)
    }

    /// Whether an (alias-resolved) type is a registered canonical type.
    pub fn is_canonical_type(&self, canonical_type: &str) -> bool {
        self.canonical_types.contains(canonical_type)
    }

    /// All registered canonical types, sorted.
    pub fn canonical_types(&self) -> impl Iterator<Item = &str> {
        self.canonical_types.iter().map(String::as_str)
    }

    /// Primary native spelling for a registered canonical type.
    pub fn native_spelling(&self, canonical_type: &str) -> Option<&str> {
        self.types.native_for(canonical_type)
    }

    /// Canonical pin names registered for a type.
    pub fn pins_for(&self, canonical_type: &str) -> Vec<&str> {
        self.pins.pins_for(canonical_type)
    }

    /// Pin-naming pattern for a type; `None` when the type has no
    /// registered pins (callers fall back to [`default_pin_pattern`]).
    ///
    /// [`default_pin_pattern`]: MappingSet::default_pin_pattern
    pub fn pin_pattern(&self, canonical_type: &str) -> Option<&Regex> {
        self.pins.pattern_for(canonical_type)
    }

    pub fn default_pin_pattern(&self) -> &Regex {
        self.pins.default_pattern()
    }
}
