//! Field-tree inference for imported source documents.
//!
//! Each supported [`SourceFormat`] has its own reader:
//!
//! - **JSON**: object keys, sampling the first element of every array
//! - **CSV**: header columns as flat string leaves
//! - **XML**: elements and their attributes
//! - **SAP**: `SEGMENT` blocks of `name: type` lines
//!
//! Excel workbooks are recognized but not read.
//!
//! # Example
//!
//! ```
//! use fieldmap_ingest::infer_fields;
//! use fieldmap_model::SourceFormat;
//!
//! let fields = infer_fields(r#"{"a":{"b":1}}"#, SourceFormat::Json)?;
//! assert_eq!(fields[0].children()[0].path, "a.b");
//! # Ok::<(), fieldmap_ingest::IngestError>(())
//! ```

#![deny(unsafe_code)]

mod csv;
mod document;
mod error;
mod json;
mod options;
mod sap;
mod xml;

use fieldmap_model::{Field, SourceFormat};
use tracing::debug;

pub use document::load_document;
pub use error::{IngestError, Result};
pub use json::fields_from_value;
pub use options::{DEFAULT_MAX_DEPTH, InferOptions};

const EXCEL_REASON: &str = "Excel parsing not implemented yet";

/// Infer the field tree of `content` with default options.
pub fn infer_fields(content: &str, format: SourceFormat) -> Result<Vec<Field>> {
    infer_fields_with(content, format, &InferOptions::default())
}

/// Infer the field tree of `content`.
pub fn infer_fields_with(
    content: &str,
    format: SourceFormat,
    options: &InferOptions,
) -> Result<Vec<Field>> {
    let fields = match format {
        SourceFormat::Json => json::infer(content, options)?,
        SourceFormat::Csv => csv::infer(content)?,
        SourceFormat::Xml => xml::infer(content, options)?,
        SourceFormat::Sap => sap::infer(content),
        SourceFormat::Excel => {
            return Err(IngestError::unsupported(format.as_str(), EXCEL_REASON));
        }
    };
    debug!(%format, top_level = fields.len(), "inferred field tree");
    Ok(fields)
}

/// Resolve a user-supplied format tag such as `"json"` or `"SAP"`.
pub fn parse_format(tag: &str) -> Result<SourceFormat> {
    tag.parse::<SourceFormat>()
        .map_err(|_| IngestError::unsupported(tag.trim(), "unknown format tag"))
}

/// Infer fields for a format given by tag.
pub fn infer_fields_for_tag(content: &str, tag: &str) -> Result<Vec<Field>> {
    infer_fields(content, parse_format(tag)?)
}
