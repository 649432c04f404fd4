//! Whole-document conversion between the native format and SHDF.
//!
//! Conversion is atomic and deterministic: a document either converts
//! fully or fails with an error naming the offending component and
//! field, and converting the same input always yields the same output.

pub mod breadboard;
mod to_native;
mod to_shdf;

use crate::mapping::{MappingError, MappingSet};
use crate::schema::Document;
use crate::wokwi::WokwiDiagram;

/// Which way a conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Native diagram -> SHDF document.
    ToShdf,
    /// SHDF document -> native diagram.
    ToNative,
}

/// Whether breadboard geometry is carried through or abstracted away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvertMode {
    /// Abstract circuit: breadboard parts and every connection touching
    /// a breadboard endpoint are dropped.
    #[default]
    Logical,
    /// Physical layout: breadboard parts and positions are preserved and
    /// translated between notations.
    Physical,
}

/// Conversion-time failures. Each carries enough context to point at the
/// offending component or endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("component {id:?}: {source}")]
    Mapping {
        id: String,
        #[source]
        source: MappingError,
    },
    #[error("endpoint {endpoint:?} references undeclared component {id:?}")]
    UnknownComponent { endpoint: String, id: String },
    #[error("invalid breadboard position in endpoint {endpoint:?}")]
    BadBreadboardPosition { endpoint: String },
    #[error("component {id:?}, field {field:?}: cannot convert value {value:?}")]
    BadPropertyValue {
        id: String,
        field: String,
        value: String,
    },
}

/// Converts whole documents by composing the type and pin mappers over
/// every component and connection endpoint.
#[derive(Debug, Clone)]
pub struct DiagramConverter<'a> {
    mappings: &'a MappingSet,
    mode: ConvertMode,
}

impl<'a> DiagramConverter<'a> {
    /// A converter in the default (logical) mode.
    pub fn new(mappings: &'a MappingSet) -> Self {
        Self {
            mappings,
            mode: ConvertMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ConvertMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ConvertMode {
        self.mode
    }

    /// Convert a native diagram to an SHDF document.
    pub fn to_shdf(&self, diagram: &WokwiDiagram) -> Result<Document, ConvertError> {
        to_shdf::convert(self.mappings, self.mode, diagram)
    }

    /// Convert an SHDF document to a native diagram.
    pub fn to_native(&self, document: &Document) -> Result<WokwiDiagram, ConvertError> {
        to_native::convert(self.mappings, self.mode, document)
    }
}
