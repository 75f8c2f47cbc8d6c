//! S3-compatible object storage client.
//!
//! This crate provides:
//! - Streaming download of source assets to disk
//! - File upload with content type
//! - Public URL derivation for uploaded artifacts

pub mod client;
pub mod error;
pub mod public_url;

pub use client::{ObjectStore, StorageClient, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use public_url::PublicUrlResolver;
