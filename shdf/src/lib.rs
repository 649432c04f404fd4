//! # shdf
//!
//! Conversion and validation library for the Standardized Hardware
//! Description Format (SHDF), a vendor-neutral JSON representation of
//! microcontroller circuit designs.
//!
//! The crate translates between native simulator diagrams and SHDF
//! documents, validates SHDF JSON against structural and naming rules,
//! and analyzes circuit wiring.
//!
//! ## Quick start
//!
//! ```
//! use shdf::convert::DiagramConverter;
//! use shdf::mapping::MappingSet;
//! use shdf::wokwi::WokwiDiagram;
//!
//! let diagram = WokwiDiagram::from_json(r#"{
//!     "version": 1,
//!     "parts": [
//!         {"type": "wokwi-arduino-uno", "id": "uno1"},
//!         {"type": "wokwi-led", "id": "led1", "attrs": {"color": "red"}}
//!     ],
//!     "connections": [["led1:C", "uno1:GND.1", "black", []]]
//! }"#)?;
//!
//! let mappings = MappingSet::builtin()?;
//! let document = DiagramConverter::new(&mappings).to_shdf(&diagram)?;
//!
//! assert_eq!(document.components[1].kind, "led");
//! assert_eq!(document.connections[0].0, "led1.cathode");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analyzer;
pub mod catalog;
pub mod convert;
pub mod core;
pub mod mapping;
pub mod schema;
pub mod validator;
pub mod wokwi;

pub use crate::core::{discover_diagram_files, ConvertOptions, ConvertOutcome, ShdfCore, ShdfError};
pub use analyzer::{DesignAnalyzer, DesignReport};
pub use catalog::{ModuleCatalog, ModuleDescriptor};
pub use convert::{ConvertError, ConvertMode, DiagramConverter, Direction};
pub use mapping::{MappingError, MappingSet};
pub use schema::{Component, Connection, Document, Metadata, PropertyValue};
pub use validator::{ShdfValidator, ValidationError, ValidationReport};
pub use wokwi::{WokwiConnection, WokwiDiagram, WokwiPart};

/// Common imports for library consumers.
pub mod prelude {
    pub use crate::analyzer::DesignAnalyzer;
    pub use crate::convert::{ConvertMode, DiagramConverter, Direction};
    pub use crate::core::{ConvertOptions, ShdfCore, ShdfError};
    pub use crate::mapping::MappingSet;
    pub use crate::schema::Document;
    pub use crate::validator::ShdfValidator;
    pub use crate::wokwi::WokwiDiagram;
}
