//! Shared data models for the Reelworks transcode worker.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs, job status and typed record updates
//! - Derived artifact kinds and storage key derivation
//! - Encoding configuration for the web transcode profile

pub mod artifact;
pub mod encoding;
pub mod job;

// Re-export common types
pub use artifact::{derived_key, ArtifactKind};
pub use encoding::EncodingConfig;
pub use job::{Job, JobId, JobStatus, JobUpdate};
