//! Error types for value transformations.

use thiserror::Error;

/// Failure to compile or evaluate a custom script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Unrecognized character or malformed literal.
    #[error("invalid token at offset {offset}: {message}")]
    Lex { offset: usize, message: String },

    /// Tokens that do not form an expression.
    #[error("syntax error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    /// Any bare name other than `source`.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    #[error("`{function}` expects {expected} argument(s), got {actual}")]
    Arity {
        function: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// An operation applied to a value it does not support.
    #[error("type error: {0}")]
    Type(String),

    #[error("{what} exceeds the limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },
}

/// Errors raised while transforming a value.
///
/// These never escape [`crate::apply`]; the pipeline logs them and passes
/// the original value through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("custom script failed: {0}")]
    Script(#[from] ScriptError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
