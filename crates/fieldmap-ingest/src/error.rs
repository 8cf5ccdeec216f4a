//! Error types for field inference and document loading.

use fieldmap_model::SourceFormat;
use thiserror::Error;

/// Errors that can occur while reading a source document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The content is not well-formed for its declared format.
    #[error("invalid {format} content: {message}")]
    Parse {
        format: SourceFormat,
        message: String,
    },

    /// The format is unknown or not supported by this operation.
    #[error("unsupported source format: {format} ({reason})")]
    UnsupportedFormat { format: String, reason: String },
}

impl IngestError {
    pub(crate) fn parse(format: SourceFormat, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_format_and_reason() {
        let err = IngestError::parse(SourceFormat::Json, "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "invalid JSON content: expected value at line 1 column 1"
        );

        let err = IngestError::unsupported("EXCEL", "Excel parsing not implemented yet");
        assert_eq!(
            err.to_string(),
            "unsupported source format: EXCEL (Excel parsing not implemented yet)"
        );
    }
}
