//! Bidirectional component-type translation.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::alias::AliasResolver;
use super::MappingError;

/// Vendor prefix carried by native component types (`wokwi-led`).
pub const NATIVE_PREFIX: &str = "wokwi-";

/// One row of the base type-mapping table.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeMappingEntry {
    pub native: String,
    pub canonical: String,
}

/// Bidirectional map between native and canonical component types.
///
/// Both directions use first-wins insertion, so the data-file order is the
/// primacy order: when several native spellings collapse onto one canonical
/// type, the reverse direction reproduces the first registered spelling.
/// Descriptor-seeded entries are registered after the base table and can
/// therefore never replace a built-in mapping.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    to_canonical: BTreeMap<String, String>,
    to_native: BTreeMap<String, String>,
}

impl TypeMapper {
    pub fn new(entries: &[TypeMappingEntry]) -> Self {
        let mut mapper = Self::default();
        for entry in entries {
            mapper.register(&entry.native, &entry.canonical);
        }
        mapper
    }

    /// Register a mapping pair, first-wins in each direction.
    ///
    /// Returns true when the forward direction was newly inserted.
    pub fn register(&mut self, native: &str, canonical: &str) -> bool {
        let native = native.to_lowercase();
        let canonical = canonical.to_lowercase();
        let inserted = if self.to_canonical.contains_key(&native) {
            false
        } else {
            self.to_canonical.insert(native.clone(), canonical.clone());
            true
        };
        self.to_native.entry(canonical).or_insert(native);
        inserted
    }

    /// Translate a native component type to its canonical form.
    ///
    /// Unmapped types fall back to stripping the vendor prefix and
    /// lower-casing, so conversion stays total for unseen components.
    pub fn native_to_canonical(
        &self,
        aliases: &AliasResolver,
        native: &str,
    ) -> Result<String, MappingError> {
        let native = aliases.resolve_type(native);
        if let Some(canonical) = self.to_canonical.get(&native) {
            return Ok(canonical.clone());
        }
        fallback_canonical(&native)
    }

    /// Translate a canonical component type back to its primary native form.
    pub fn canonical_to_native(
        &self,
        aliases: &AliasResolver,
        canonical: &str,
    ) -> Result<String, MappingError> {
        let canonical = aliases.resolve_type(canonical);
        if let Some(native) = self.to_native.get(&canonical) {
            return Ok(native.clone());
        }
        fallback_native(&canonical)
    }

    /// Canonical form a native type already maps to, without the fallback.
    pub fn registered_canonical(&self, native: &str) -> Option<&str> {
        self.to_canonical.get(&native.to_lowercase()).map(String::as_str)
    }

    /// All registered canonical types, in table order.
    pub fn canonical_types(&self) -> impl Iterator<Item = &str> {
        self.to_native.keys().map(String::as_str)
    }

    /// Primary native spelling for a canonical type, if registered.
    pub fn native_for(&self, canonical: &str) -> Option<&str> {
        self.to_native.get(canonical).map(String::as_str)
    }
}

/// Fallback rule, native -> canonical: strip the vendor prefix and
/// lower-case, keeping hyphens (`wokwi-new-sensor` -> `new-sensor`).
pub(crate) fn fallback_canonical(native: &str) -> Result<String, MappingError> {
    let lower = native.to_lowercase();
    let stripped = lower.strip_prefix(NATIVE_PREFIX).unwrap_or(&lower);
    if stripped.is_empty() {
        return Err(MappingError::UnknownComponentType(native.to_string()));
    }
    Ok(stripped.to_string())
}

/// Fallback rule, canonical -> native: lower-case, map spaces to hyphens,
/// re-add the vendor prefix (`new-sensor` -> `wokwi-new-sensor`).
fn fallback_native(canonical: &str) -> Result<String, MappingError> {
    let lower = canonical.to_lowercase();
    if lower.is_empty() {
        return Err(MappingError::UnknownComponentType(canonical.to_string()));
    }
    Ok(format!("{NATIVE_PREFIX}{}", lower.replace(' ', "-")))
}
