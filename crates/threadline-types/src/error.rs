use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("comment content must not be empty")]
    EmptyContent,

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

pub type TypeResult<T> = Result<T, TypeError>;
