//! Module descriptor catalog.
//!
//! A catalog is an externally editable JSON array of component
//! descriptors (native type plus ordered pin list). It extends the
//! built-in mapping tables without code changes: descriptors seed type
//! and pin mappings for components the base tables do not know, and
//! never override an explicit built-in entry.
//!
//! Loading is lenient by design: one malformed entry is skipped with a
//! collected warning so a single bad descriptor does not block the rest
//! of the catalog. Only a syntactically unparseable file is an error.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Embedded default catalog, compiled into the binary as a fallback.
const EMBEDDED_CATALOG: &str = include_str!("data/module_catalog.json");

/// Errors raised by catalog loading and mapping-table construction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid pin name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One pin of a module descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDescriptor {
    pub pin_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Externally supplied description of one native component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub native_type: String,
    #[serde(default)]
    pub pins: Vec<PinDescriptor>,
}

/// A loaded set of module descriptors plus the warnings collected while
/// loading them.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    descriptors: Vec<ModuleDescriptor>,
    warnings: Vec<String>,
}

impl ModuleCatalog {
    /// Parse the catalog that ships embedded in the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::load_str(EMBEDDED_CATALOG)
    }

    /// Parse a catalog from a JSON string.
    ///
    /// Entries missing their native type identifier (or otherwise
    /// malformed) are skipped with a warning; duplicates keep the first
    /// occurrence.
    pub fn load_str(input: &str) -> Result<Self, CatalogError> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(input)?;
        let mut catalog = Self::default();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for (index, entry) in raw.into_iter().enumerate() {
            let descriptor = match serde_json::from_value::<ModuleDescriptor>(entry) {
                Ok(d) => d,
                Err(e) => {
                    catalog.warn(format!("skipping catalog entry {index}: {e}"));
                    continue;
                }
            };
            if descriptor.native_type.trim().is_empty() {
                catalog.warn(format!("skipping catalog entry {index}: empty native_type"));
                continue;
            }
            if !seen.insert(descriptor.native_type.to_lowercase()) {
                catalog.warn(format!(
                    "skipping catalog entry {index}: duplicate native_type {:?}",
                    descriptor.native_type
                ));
                continue;
            }
            catalog.descriptors.push(descriptor);
        }

        tracing::info!(
            "loaded {} module descriptors ({} warnings)",
            catalog.descriptors.len(),
            catalog.warnings.len()
        );
        Ok(catalog)
    }

    /// Load a catalog from a single JSON file.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&content)
    }

    /// Load every `*.json` catalog file in a directory.
    ///
    /// An unreadable or unparseable file yields a warning, never a hard
    /// abort; duplicates across files keep the first occurrence.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        if !dir.is_dir() {
            return Ok(catalog);
        }

        let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        for path in paths {
            match Self::load_file(&path) {
                Ok(loaded) => catalog.merge(loaded),
                Err(e) => catalog.warn(format!("failed to load {}: {e}", path.display())),
            }
        }
        Ok(catalog)
    }

    /// Fold another catalog into this one, first occurrence winning per
    /// native type.
    pub fn merge(&mut self, other: ModuleCatalog) {
        let known: BTreeSet<String> = self
            .descriptors
            .iter()
            .map(|d| d.native_type.to_lowercase())
            .collect();
        for descriptor in other.descriptors {
            if known.contains(&descriptor.native_type.to_lowercase()) {
                continue;
            }
            self.descriptors.push(descriptor);
        }
        self.warnings.extend(other.warnings);
    }

    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.descriptors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}
