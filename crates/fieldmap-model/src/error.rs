use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown source format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
