//! Data model for the field-mapping engine.
//!
//! - **field**: inferred field trees and tree utilities
//! - **format**: source format tags
//! - **mapping**: field mappings and mapping configurations
//! - **transformation**: the closed set of value transformations
//! - **record**: persisted mapping and history records

#![deny(unsafe_code)]

pub mod error;
pub mod field;
pub mod format;
pub mod mapping;
pub mod record;
pub mod transformation;

pub use error::{ModelError, Result};
pub use field::{Field, FieldType, filter_fields, find_field, leaf_paths};
pub use format::SourceFormat;
pub use mapping::{FieldMapping, MappingConfig, MappingIssue, paths_overlap};
pub use record::{Mapping, MappingHistory, MappingUpdate, NewHistory, NewMapping};
pub use transformation::{
    DateStyle, LookupTable, NumberStyle, StringOp, TransformKind, Transformation,
};
