//! Source documents for the output builder.

use fieldmap_model::SourceFormat;
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::{csv, json};

/// Parse `content` into the document the mappings are applied to.
///
/// JSON loads as-is and CSV loads as an array of row objects. XML, SAP and
/// Excel sources describe their fields only; their documents are not
/// materialized.
pub fn load_document(content: &str, format: SourceFormat) -> Result<Value> {
    debug!(%format, bytes = content.len(), "loading source document");
    match format {
        SourceFormat::Json => json::parse(content),
        SourceFormat::Csv => csv::load(content),
        SourceFormat::Xml | SourceFormat::Sap => Err(IngestError::unsupported(
            format.as_str(),
            "document loading is limited to JSON and CSV",
        )),
        SourceFormat::Excel => Err(IngestError::unsupported(
            format.as_str(),
            crate::EXCEL_REASON,
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_loads_verbatim() {
        let doc = load_document(r#"{"a":[1,2]}"#, SourceFormat::Json).unwrap();
        assert_eq!(doc, json!({"a": [1, 2]}));
    }

    #[test]
    fn structural_formats_are_not_materialized() {
        for format in [SourceFormat::Xml, SourceFormat::Sap, SourceFormat::Excel] {
            assert!(matches!(
                load_document("<a/>", format),
                Err(IngestError::UnsupportedFormat { .. })
            ));
        }
    }
}
