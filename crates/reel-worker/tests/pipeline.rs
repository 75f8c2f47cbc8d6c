//! End-to-end tests of the job lifecycle with fake collaborators.
//!
//! The record store, object store and codec process are replaced by
//! in-memory fakes so every state transition, upload and cleanup guarantee
//! can be observed from the outside.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use reel_media::{FfmpegCommand, MediaError, MediaResult, ProcessRunner};
use reel_models::{Job, JobId, JobStatus, JobUpdate};
use reel_records::{JobStore, RecordsError, RecordsResult};
use reel_storage::{ObjectStore, PublicUrlResolver, StorageConfig, StorageError, StorageResult};
use reel_worker::{JobExecutor, WorkerConfig};

#[derive(Default)]
struct FakeObjectStore {
    missing_source: bool,
    fail_video_upload: bool,
    fail_thumbnail_upload: bool,
    uploads: Mutex<Vec<(String, String)>>,
}

impl FakeObjectStore {
    fn uploaded_keys(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn download_to_file(&self, key: &str, dest: &Path) -> StorageResult<()> {
        if self.missing_source {
            return Err(StorageError::not_found(key));
        }
        tokio::fs::write(dest, b"raw source bytes").await?;
        Ok(())
    }

    async fn upload_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()> {
        assert!(path.exists(), "upload of a file that does not exist: {}", path.display());
        if key.ends_with("_h264.mp4") && self.fail_video_upload {
            return Err(StorageError::upload_failed("simulated video upload failure"));
        }
        if key.ends_with("_thumb.jpg") && self.fail_thumbnail_upload {
            return Err(StorageError::upload_failed("simulated thumbnail upload failure"));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string()));
        Ok(())
    }
}

/// Fake codec process: writes a stub output file on success, returns a
/// non-zero exit code on simulated failure.
#[derive(Default)]
struct FakeRunner {
    fail_video: bool,
    fail_thumbnail: bool,
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let output = cmd.output_path();
        let is_thumbnail = output.extension().is_some_and(|ext| ext == "jpg");
        let fail = if is_thumbnail {
            self.fail_thumbnail
        } else {
            self.fail_video
        };
        if fail {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                None,
                Some(1),
            ));
        }
        std::fs::write(output, b"artifact")?;
        Ok(())
    }
}

#[derive(Default)]
struct FakeJobStore {
    jobs: Mutex<HashMap<String, Job>>,
    updates: Mutex<Vec<JobUpdate>>,
    fail_completed_write: bool,
}

impl FakeJobStore {
    fn with_job(job: Job) -> Self {
        let store = Self::default();
        store
            .jobs
            .lock()
            .unwrap()
            .insert(job.id.as_str().to_string(), job);
        store
    }

    fn recorded_statuses(&self) -> Vec<JobStatus> {
        self.updates.lock().unwrap().iter().map(|u| u.status).collect()
    }

    fn last_update(&self) -> JobUpdate {
        self.updates.lock().unwrap().last().cloned().expect("no updates recorded")
    }

    fn stored_status(&self, id: &str) -> JobStatus {
        self.jobs.lock().unwrap().get(id).expect("job missing").status
    }
}

#[async_trait]
impl JobStore for FakeJobStore {
    async fn load_job(&self, id: &JobId) -> RecordsResult<Job> {
        self.jobs
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RecordsError::not_found(id.as_str()))
    }

    async fn update_job(&self, id: &JobId, update: &JobUpdate) -> RecordsResult<()> {
        if self.fail_completed_write && update.status == JobStatus::Completed {
            return Err(RecordsError::request_failed("simulated write failure"));
        }
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(id.as_str())
            .ok_or_else(|| RecordsError::not_found(id.as_str()))?;
        job.status = update.status;
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }
}

fn test_job() -> Job {
    Job {
        id: JobId::from("abc123"),
        source_ref: "raw/abc123.mov".to_string(),
        status: JobStatus::Queued,
        video_url_h264: None,
        thumbnail_url: None,
        error_message: None,
        created_at: None,
        updated_at: None,
    }
}

fn url_resolver() -> PublicUrlResolver {
    let config = StorageConfig {
        endpoint_url: "https://storage.example.com".to_string(),
        access_key_id: "key".to_string(),
        secret_access_key: "secret".to_string(),
        bucket_name: "media".to_string(),
        region: "auto".to_string(),
        public_base_url: None,
    };
    PublicUrlResolver::new(&config)
}

struct Harness {
    executor: JobExecutor,
    records: Arc<FakeJobStore>,
    storage: Arc<FakeObjectStore>,
    work_dir: tempfile::TempDir,
}

fn harness(records: FakeJobStore, storage: FakeObjectStore, runner: FakeRunner) -> Harness {
    let work_dir = tempfile::tempdir().unwrap();
    let config = WorkerConfig {
        work_dir: work_dir.path().to_path_buf(),
        ..WorkerConfig::default()
    };
    let records = Arc::new(records);
    let storage = Arc::new(storage);
    let executor = JobExecutor::new(
        config,
        records.clone(),
        storage.clone(),
        Arc::new(runner),
        url_resolver(),
    );
    Harness {
        executor,
        records,
        storage,
        work_dir,
    }
}

fn staging_entries(work_dir: &tempfile::TempDir) -> usize {
    std::fs::read_dir(work_dir.path()).unwrap().count()
}

#[tokio::test]
async fn successful_run_records_both_urls() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore::default(),
        FakeRunner::default(),
    );

    h.executor.execute(&JobId::from("abc123")).await.unwrap();

    assert_eq!(
        h.records.recorded_statuses(),
        vec![JobStatus::Processing, JobStatus::Completed]
    );
    let update = h.records.last_update();
    assert_eq!(
        update.video_url_h264.as_deref(),
        Some("https://storage.example.com/media/raw/abc123_h264.mp4")
    );
    assert_eq!(
        update.thumbnail_url.as_deref(),
        Some("https://storage.example.com/media/raw/abc123_thumb.jpg")
    );
    assert!(update.completed_at.is_some());

    let uploads = h.storage.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2);
    assert!(uploads.contains(&("raw/abc123_h264.mp4".to_string(), "video/mp4".to_string())));
    assert!(uploads.contains(&("raw/abc123_thumb.jpg".to_string(), "image/jpeg".to_string())));

    assert_eq!(staging_entries(&h.work_dir), 0);
}

#[tokio::test]
async fn missing_source_object_marks_job_failed() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore {
            missing_source: true,
            ..FakeObjectStore::default()
        },
        FakeRunner::default(),
    );

    let err = h.executor.execute(&JobId::from("abc123")).await.unwrap_err();
    assert!(matches!(
        err,
        reel_worker::WorkerError::Storage(StorageError::NotFound(_))
    ));

    assert_eq!(
        h.records.recorded_statuses(),
        vec![JobStatus::Processing, JobStatus::Failed]
    );
    assert!(h.records.last_update().error_message.is_some());
    assert!(h.storage.uploaded_keys().is_empty());
    assert_eq!(staging_entries(&h.work_dir), 0);
}

#[tokio::test]
async fn transcode_failure_marks_failed_and_skips_uploads() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore::default(),
        FakeRunner {
            fail_video: true,
            ..FakeRunner::default()
        },
    );

    let err = h.executor.execute(&JobId::from("abc123")).await.unwrap_err();
    match err {
        reel_worker::WorkerError::TranscodeFailed { exit_code, .. } => {
            assert_eq!(exit_code, Some(1));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(h.records.stored_status("abc123"), JobStatus::Failed);
    assert!(h.storage.uploaded_keys().is_empty());
    assert_eq!(staging_entries(&h.work_dir), 0);
}

#[tokio::test]
async fn thumbnail_extraction_failure_still_completes() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore::default(),
        FakeRunner {
            fail_thumbnail: true,
            ..FakeRunner::default()
        },
    );

    h.executor.execute(&JobId::from("abc123")).await.unwrap();

    let update = h.records.last_update();
    assert_eq!(update.status, JobStatus::Completed);
    assert!(update.video_url_h264.is_some());
    assert!(update.thumbnail_url.is_none());

    assert_eq!(h.storage.uploaded_keys(), vec!["raw/abc123_h264.mp4".to_string()]);
    assert_eq!(staging_entries(&h.work_dir), 0);
}

#[tokio::test]
async fn thumbnail_upload_failure_still_completes() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore {
            fail_thumbnail_upload: true,
            ..FakeObjectStore::default()
        },
        FakeRunner::default(),
    );

    h.executor.execute(&JobId::from("abc123")).await.unwrap();

    let update = h.records.last_update();
    assert_eq!(update.status, JobStatus::Completed);
    assert!(update.thumbnail_url.is_none());
    assert_eq!(h.storage.uploaded_keys(), vec!["raw/abc123_h264.mp4".to_string()]);
}

#[tokio::test]
async fn video_upload_failure_marks_job_failed() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore {
            fail_video_upload: true,
            ..FakeObjectStore::default()
        },
        FakeRunner::default(),
    );

    let err = h.executor.execute(&JobId::from("abc123")).await.unwrap_err();
    assert!(matches!(err, reel_worker::WorkerError::UploadFailed(_)));

    assert_eq!(h.records.stored_status("abc123"), JobStatus::Failed);
    assert_eq!(staging_entries(&h.work_dir), 0);
}

#[tokio::test]
async fn unknown_job_fails_before_any_write() {
    let h = harness(
        FakeJobStore::default(),
        FakeObjectStore::default(),
        FakeRunner::default(),
    );

    let err = h.executor.execute(&JobId::from("nope")).await.unwrap_err();
    assert!(matches!(err, reel_worker::WorkerError::JobNotFound(_)));

    assert!(h.records.recorded_statuses().is_empty());
    assert_eq!(staging_entries(&h.work_dir), 0);
}

#[tokio::test]
async fn rerun_derives_identical_keys() {
    let h = harness(
        FakeJobStore::with_job(test_job()),
        FakeObjectStore::default(),
        FakeRunner::default(),
    );

    h.executor.execute(&JobId::from("abc123")).await.unwrap();
    h.executor.execute(&JobId::from("abc123")).await.unwrap();

    let keys = h.storage.uploaded_keys();
    assert_eq!(keys.len(), 4);
    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 2);
}

#[tokio::test]
async fn final_status_write_failure_surfaces_error() {
    let h = harness(
        FakeJobStore {
            fail_completed_write: true,
            ..FakeJobStore::with_job(test_job())
        },
        FakeObjectStore::default(),
        FakeRunner::default(),
    );

    let err = h.executor.execute(&JobId::from("abc123")).await.unwrap_err();
    assert!(matches!(err, reel_worker::WorkerError::Records(_)));

    // The work succeeded but the record is observably stuck in processing.
    assert_eq!(h.records.recorded_statuses(), vec![JobStatus::Processing]);
    assert_eq!(h.records.stored_status("abc123"), JobStatus::Processing);
    assert_eq!(staging_entries(&h.work_dir), 0);
}
