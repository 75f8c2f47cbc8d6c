//! Derived artifact kinds and storage key derivation.

use serde::{Deserialize, Serialize};

/// Kind of artifact produced by a transcode job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The mandatory H.264 web transcode.
    Video,
    /// The best-effort still-frame thumbnail.
    Thumbnail,
}

impl ArtifactKind {
    /// Suffix appended to the source base key.
    pub fn key_suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Video => "_h264.mp4",
            ArtifactKind::Thumbnail => "_thumb.jpg",
        }
    }

    /// MIME content type for uploads.
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Video => "video/mp4",
            ArtifactKind::Thumbnail => "image/jpeg",
        }
    }
}

/// Derive the storage key for an artifact from the source key.
///
/// Strips the source file extension and appends the kind's fixed suffix,
/// so repeated runs for the same job write the same keys (overwrite, not
/// accumulate). Only the final path segment is inspected for an extension.
pub fn derived_key(source_key: &str, kind: ArtifactKind) -> String {
    let (dir, file) = match source_key.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, source_key),
    };
    let stem = match file.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file,
    };
    match dir {
        Some(dir) => format!("{}/{}{}", dir, stem, kind.key_suffix()),
        None => format!("{}{}", stem, kind.key_suffix()),
    }
}
