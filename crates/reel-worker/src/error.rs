//! Worker error types.

use thiserror::Error;

use reel_media::MediaError;
use reel_records::RecordsError;
use reel_storage::StorageError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Mandatory transcode failed: {message}")]
    TranscodeFailed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Records error: {0}")]
    Records(#[from] RecordsError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn transcode_failed(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::TranscodeFailed {
            message: message.into(),
            exit_code,
        }
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The external process exit code, when the error carries one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            WorkerError::TranscodeFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}
