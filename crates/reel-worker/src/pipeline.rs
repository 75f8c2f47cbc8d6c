//! The fetch → transcode → publish pipeline.

use std::sync::Arc;

use reel_media::{extract_thumbnail, transcode_web, ProcessRunner};
use reel_models::{derived_key, ArtifactKind, EncodingConfig, Job};
use reel_storage::{ObjectStore, PublicUrlResolver};

use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::staging::StagingArea;

/// Collaborators needed by the pipeline, constructed once at startup.
pub struct PipelineContext {
    pub storage: Arc<dyn ObjectStore>,
    pub runner: Arc<dyn ProcessRunner>,
    pub urls: PublicUrlResolver,
    pub encoding: EncodingConfig,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Public URL of the transcoded video.
    pub video_url: String,
    /// Public URL of the thumbnail, when extraction and upload both succeeded.
    pub thumbnail_url: Option<String>,
}

/// Run the pipeline for one job inside its staging area.
///
/// Stages run sequentially; within the encode and publish stages the two
/// independent operations run concurrently. Thumbnail extraction and
/// thumbnail upload failures are recovered here and never fail the job;
/// everything else propagates to the job state controller.
pub async fn run_pipeline(
    ctx: &PipelineContext,
    job: &Job,
    staging: &StagingArea,
    logger: &JobLogger,
) -> WorkerResult<PipelineOutcome> {
    // Fetch the source asset. A partial download never reaches the encoder:
    // the storage client returns only after the file is flushed to disk.
    let source_path = staging.source_path(&job.source_ref);
    logger.log_progress(&format!("fetching {}", job.source_ref));
    ctx.storage
        .download_to_file(&job.source_ref, &source_path)
        .await?;

    // Encode. Both invocations only read the shared input, so they run
    // concurrently; the video result alone decides the job's fate.
    let video_path = staging.video_path();
    let thumbnail_path = staging.thumbnail_path();
    logger.log_progress("transcoding");
    let (thumbnail_result, video_result) = tokio::join!(
        extract_thumbnail(ctx.runner.as_ref(), &source_path, &thumbnail_path),
        transcode_web(ctx.runner.as_ref(), &source_path, &video_path, &ctx.encoding),
    );

    if let Err(e) = thumbnail_result {
        logger.log_warning(&format!(
            "thumbnail extraction failed, continuing without thumbnail: {}",
            e
        ));
    }
    if let Err(e) = video_result {
        let exit_code = e.exit_code();
        return Err(WorkerError::transcode_failed(e.to_string(), exit_code));
    }

    // Publish. The video upload is mandatory; the thumbnail is attempted
    // only if its file exists (absence is a skip, not an error).
    let video_key = derived_key(&job.source_ref, ArtifactKind::Video);
    let thumbnail_key = derived_key(&job.source_ref, ArtifactKind::Thumbnail);
    logger.log_progress(&format!("publishing {}", video_key));

    let upload_video = ctx.storage.upload_file(
        &video_path,
        &video_key,
        ArtifactKind::Video.content_type(),
    );
    let upload_thumbnail = async {
        if !thumbnail_path.exists() {
            return None;
        }
        match ctx
            .storage
            .upload_file(
                &thumbnail_path,
                &thumbnail_key,
                ArtifactKind::Thumbnail.content_type(),
            )
            .await
        {
            Ok(()) => Some(thumbnail_key.clone()),
            Err(e) => {
                logger.log_warning(&format!("thumbnail upload failed: {}", e));
                None
            }
        }
    };

    let (video_upload, thumbnail_uploaded) = tokio::join!(upload_video, upload_thumbnail);
    video_upload.map_err(|e| WorkerError::upload_failed(e.to_string()))?;

    Ok(PipelineOutcome {
        video_url: ctx.urls.url_for(&video_key),
        thumbnail_url: thumbnail_uploaded.map(|key| ctx.urls.url_for(&key)),
    })
}
