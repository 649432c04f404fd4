//! File-level entry points shared by the CLI and library consumers.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog::CatalogError;
use crate::convert::{ConvertError, ConvertMode, DiagramConverter, Direction};
use crate::mapping::{MappingError, MappingSet};
use crate::schema::Document;
use crate::validator::{ShdfValidator, ValidationReport};
use crate::wokwi::WokwiDiagram;

/// Directory names skipped while discovering diagram files.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "build"];
const MAX_DISCOVERY_DEPTH: usize = 20;

/// Top-level failure type for file-based operations.
#[derive(Debug, thiserror::Error)]
pub enum ShdfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Knobs for a conversion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub mode: ConvertMode,
}

/// Result of a conversion: the output JSON plus counts for reporting.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub output: Value,
    pub component_count: usize,
    pub connection_count: usize,
}

/// Stateless façade over the converter and validator.
pub struct ShdfCore;

impl ShdfCore {
    /// Convert a JSON string in the given direction.
    pub fn convert_str(
        input: &str,
        direction: Direction,
        mappings: &MappingSet,
        options: ConvertOptions,
    ) -> Result<ConvertOutcome, ShdfError> {
        let converter = DiagramConverter::new(mappings).with_mode(options.mode);
        match direction {
            Direction::ToShdf => {
                let diagram = WokwiDiagram::from_json(input)?;
                let document = converter.to_shdf(&diagram)?;
                Ok(ConvertOutcome {
                    component_count: document.components.len(),
                    connection_count: document.connections.len(),
                    output: serde_json::to_value(&document)?,
                })
            }
            Direction::ToNative => {
                let document = Document::from_json(input)?;
                let diagram = converter.to_native(&document)?;
                Ok(ConvertOutcome {
                    component_count: diagram.parts.len(),
                    connection_count: diagram.connections.len(),
                    output: serde_json::to_value(&diagram)?,
                })
            }
        }
    }

    /// Convert a file on disk in the given direction.
    pub fn convert_file(
        path: &Path,
        direction: Direction,
        mappings: &MappingSet,
        options: ConvertOptions,
    ) -> Result<ConvertOutcome, ShdfError> {
        tracing::info!("converting {}", path.display());
        let input = fs::read_to_string(path)?;
        Self::convert_str(&input, direction, mappings, options)
    }

    /// Validate an SHDF JSON string.
    pub fn validate_str(
        input: &str,
        mappings: &MappingSet,
    ) -> Result<ValidationReport, ShdfError> {
        Ok(ShdfValidator::new(mappings).validate_str(input)?)
    }

    /// Validate an SHDF file on disk.
    pub fn validate_file(
        path: &Path,
        mappings: &MappingSet,
    ) -> Result<ValidationReport, ShdfError> {
        tracing::info!("validating {}", path.display());
        let input = fs::read_to_string(path)?;
        Self::validate_str(&input, mappings)
    }
}

/// Recursively collect `.json` files under a directory, skipping hidden
/// directories and common build outputs. Results are sorted for
/// deterministic processing order.
pub fn discover_diagram_files(dir: &Path) -> Result<Vec<PathBuf>, ShdfError> {
    let mut found = Vec::new();
    walk(dir, 0, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, depth: usize, found: &mut Vec<PathBuf>) -> Result<(), ShdfError> {
    if depth > MAX_DISCOVERY_DEPTH {
        tracing::warn!("skipping {}: directory tree too deep", dir.display());
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            walk(&path, depth + 1, found)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            found.push(path);
        }
    }
    Ok(())
}
