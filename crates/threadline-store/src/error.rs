/// Errors from comment store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("store rejected request ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The request never got an answer (connection, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The answer could not be decoded into comment rows.
    #[error("decode error: {0}")]
    Decode(String),

    /// The store is unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// The human-readable message to surface in a view.
    pub fn message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
