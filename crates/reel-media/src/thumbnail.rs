//! Thumbnail extraction.

use std::path::Path;

use crate::command::{FfmpegCommand, ProcessRunner};
use crate::error::MediaResult;
use reel_models::encoding::{THUMBNAIL_SCALE_WIDTH, THUMBNAIL_TIMESTAMP};

/// Build the thumbnail extraction command.
///
/// Seeks one second in, extracts a single frame and scales it to a fixed
/// width, preserving aspect ratio with an even height.
pub fn thumbnail_command(input: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    let filter = format!("scale={}:-2", THUMBNAIL_SCALE_WIDTH);

    FfmpegCommand::new(input.as_ref(), output.as_ref())
        .seek(THUMBNAIL_TIMESTAMP)
        .single_frame()
        .video_filter(filter)
        .log_level("error")
}

/// Extract a thumbnail from a video file.
///
/// Callers treat failure as non-fatal; whether a thumbnail exists is decided
/// later by checking the output file, not this result.
pub async fn extract_thumbnail(
    runner: &dyn ProcessRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let cmd = thumbnail_command(input, output);
    runner.run(&cmd).await
}
