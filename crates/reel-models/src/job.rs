//! Job record models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a transcode job.
///
/// Job ids are supplied by the system that enqueued the job; the worker
/// never generates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued waiting for a worker
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job record as stored in the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Object storage key of the raw source asset.
    ///
    /// Resolved once at load time; mutations afterward are not observed.
    pub source_ref: String,

    /// Processing status
    #[serde(default)]
    pub status: JobStatus,

    /// Public URL of the H.264 transcode (set on completion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url_h264: Option<String>,

    /// Public URL of the thumbnail (optional even on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Typed partial update written back to the record store.
///
/// Fields left as `None` are omitted from the serialized payload and
/// therefore not written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobUpdate {
    /// New processing status
    pub status: JobStatus,

    /// Public URL of the H.264 transcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url_h264: Option<String>,

    /// Public URL of the thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Completion timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Failure timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl JobUpdate {
    fn with_status(status: JobStatus) -> Self {
        Self {
            status,
            video_url_h264: None,
            thumbnail_url: None,
            error_message: None,
            completed_at: None,
            failed_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Update marking the job as accepted for processing.
    pub fn processing() -> Self {
        Self::with_status(JobStatus::Processing)
    }

    /// Update marking the job as completed with its result locators.
    pub fn completed(video_url: impl Into<String>, thumbnail_url: Option<String>) -> Self {
        Self {
            video_url_h264: Some(video_url.into()),
            thumbnail_url,
            completed_at: Some(Utc::now()),
            ..Self::with_status(JobStatus::Completed)
        }
    }

    /// Update marking the job as failed with an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error_message: Some(error.into()),
            failed_at: Some(Utc::now()),
            ..Self::with_status(JobStatus::Failed)
        }
    }
}
