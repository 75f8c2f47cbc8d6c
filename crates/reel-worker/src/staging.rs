//! Per-job staging area management.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use reel_models::JobId;

/// Names of the working files inside a staging area.
const VIDEO_FILE: &str = "video_h264.mp4";
const THUMBNAIL_FILE: &str = "thumb.jpg";
const SOURCE_STEM: &str = "source";

/// An exclusively-owned temporary directory for one job invocation.
///
/// Created only after the job is marked processing, destroyed on every exit
/// path. Removal failures are logged and swallowed; cleanup must never mask
/// the pipeline's real outcome. The `Drop` impl is a best-effort backstop
/// for paths that skip [`StagingArea::release`] (e.g. a panic unwinding).
#[derive(Debug)]
pub struct StagingArea {
    path: PathBuf,
    released: bool,
}

impl StagingArea {
    /// Create a uniquely named staging directory under `work_dir`.
    ///
    /// The random suffix keeps concurrent invocations on a shared filesystem
    /// from colliding even for the same job id.
    pub async fn acquire(work_dir: &Path, job_id: &JobId) -> std::io::Result<Self> {
        let dir_name = format!("{}-{}", sanitize_for_path(job_id.as_str()), Uuid::new_v4());
        let path = work_dir.join(dir_name);
        tokio::fs::create_dir_all(&path).await?;
        debug!("Created staging area {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    /// The staging directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for the downloaded source asset, keeping its original extension.
    pub fn source_path(&self, source_key: &str) -> PathBuf {
        let file_name = source_key.rsplit('/').next().unwrap_or(source_key);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                self.path.join(format!("{}.{}", SOURCE_STEM, ext))
            }
            _ => self.path.join(SOURCE_STEM),
        }
    }

    /// Path for the transcoded video.
    pub fn video_path(&self) -> PathBuf {
        self.path.join(VIDEO_FILE)
    }

    /// Path for the extracted thumbnail.
    pub fn thumbnail_path(&self) -> PathBuf {
        self.path.join(THUMBNAIL_FILE)
    }

    /// Recursively remove the staging directory.
    ///
    /// Idempotent; errors are logged, never propagated.
    pub async fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.path.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
                warn!("Failed to remove staging area {}: {}", self.path.display(), e);
            } else {
                debug!("Removed staging area {}", self.path.display());
            }
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if !self.released && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

/// Replace characters that are not filesystem-safe in a directory name.
fn sanitize_for_path(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_id() -> JobId {
        JobId::from("abc123")
    }

    #[tokio::test]
    async fn test_acquire_creates_unique_directories() {
        let work_dir = tempfile::tempdir().unwrap();
        let a = StagingArea::acquire(work_dir.path(), &job_id()).await.unwrap();
        let b = StagingArea::acquire(work_dir.path(), &job_id()).await.unwrap();

        assert!(a.path().is_dir());
        assert!(b.path().is_dir());
        assert_ne!(a.path(), b.path());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("abc123-"));
    }

    #[tokio::test]
    async fn test_release_removes_directory_and_contents() {
        let work_dir = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::acquire(work_dir.path(), &job_id()).await.unwrap();
        tokio::fs::write(staging.video_path(), b"data").await.unwrap();

        staging.release().await;
        assert!(!staging.path().exists());

        // Idempotent.
        staging.release().await;
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let work_dir = tempfile::tempdir().unwrap();
        let path = {
            let staging = StagingArea::acquire(work_dir.path(), &job_id()).await.unwrap();
            staging.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_source_path_keeps_extension() {
        let work_dir = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::acquire(work_dir.path(), &job_id()).await.unwrap();

        let with_ext = staging.source_path("raw/abc123.mov");
        assert_eq!(with_ext.file_name().unwrap(), "source.mov");

        let without_ext = staging.source_path("raw/abc123");
        assert_eq!(without_ext.file_name().unwrap(), "source");

        staging.release().await;
    }

    #[test]
    fn test_sanitize_for_path() {
        assert_eq!(sanitize_for_path("abc123"), "abc123");
        assert_eq!(sanitize_for_path("a/b:c"), "a_b_c");
    }
}
