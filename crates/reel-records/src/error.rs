//! Record store error types.

use thiserror::Error;

/// Result type for record store operations.
pub type RecordsResult<T> = Result<T, RecordsError>;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("Failed to configure records client: {0}")]
    ConfigError(String),

    #[error("Job record not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordsError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// True if the error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordsError::NotFound(_))
    }
}
