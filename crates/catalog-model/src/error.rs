use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("page size must be at least 1")]
    ZeroPageSize,
    #[error("facet field declared twice: {0}")]
    DuplicateFacet(String),
    #[error("unknown listing preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
