//! Source format tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Format of an imported source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceFormat {
    Json,
    Csv,
    Xml,
    /// Segment-oriented SAP IDoc text.
    Sap,
    Excel,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::Json,
        SourceFormat::Csv,
        SourceFormat::Xml,
        SourceFormat::Sap,
        SourceFormat::Excel,
    ];

    /// Returns the upper-case tag used on the wire (e.g. "JSON").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Xml => "XML",
            Self::Sap => "SAP",
            Self::Excel => "EXCEL",
        }
    }

    /// Guess the format from a file extension (case-insensitive, without the dot).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "xml" => Some(Self::Xml),
            "sap" | "idoc" | "txt" => Some(Self::Sap),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ModelError::UnknownFormat(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!("json".parse::<SourceFormat>(), Ok(SourceFormat::Json));
        assert_eq!(" Sap ".parse::<SourceFormat>(), Ok(SourceFormat::Sap));
        assert_eq!(
            "yaml".parse::<SourceFormat>(),
            Err(ModelError::UnknownFormat("yaml".to_string()))
        );
    }

    #[test]
    fn serializes_as_upper_case_tag() {
        let json = serde_json::to_string(&SourceFormat::Excel).unwrap();
        assert_eq!(json, "\"EXCEL\"");
    }

    #[test]
    fn detects_extension() {
        assert_eq!(SourceFormat::from_extension("XML"), Some(SourceFormat::Xml));
        assert_eq!(SourceFormat::from_extension("idoc"), Some(SourceFormat::Sap));
        assert_eq!(SourceFormat::from_extension("parquet"), None);
    }
}
