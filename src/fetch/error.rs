use std::fmt;

/// Store retrieval errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("config '{name}' not found")]
    NotFound { name: String },

    #[error("fetch cancelled")]
    Cancelled,

    #[error("fetch deadline exceeded")]
    DeadlineExceeded,

    #[error("I/O error reading config '{name}': {message}")]
    Io { name: String, message: String },

    #[error("config '{name}' could not be decoded: {message}")]
    Parse { name: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn other(message: impl fmt::Display) -> Self {
        Self::Other(message.to_string())
    }

    /// The only error an optional resolution policy may skip
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Cancellation or deadline expiry of the caller's context
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}
