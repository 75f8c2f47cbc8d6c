//! Web-playable H.264 transcode.

use std::path::Path;

use crate::command::{FfmpegCommand, ProcessRunner};
use crate::error::MediaResult;
use reel_models::EncodingConfig;

/// Build the web transcode command.
///
/// Output height is capped at `config.max_height` and forced to an even
/// value; width follows from the aspect ratio (`-2` keeps it even as well).
/// `+faststart` moves the moov atom up front so playback can begin before
/// the file finishes downloading.
pub fn transcode_command(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &EncodingConfig,
) -> FfmpegCommand {
    let filter = format!("scale=-2:'trunc(min({},ih)/2)*2'", config.max_height);

    FfmpegCommand::new(input.as_ref(), output.as_ref())
        .video_codec(&config.codec)
        .preset(&config.preset)
        .crf(config.crf)
        .video_filter(filter)
        .output_arg("-pix_fmt")
        .output_arg("yuv420p")
        .audio_codec(&config.audio_codec)
        .audio_bitrate(&config.audio_bitrate)
        .audio_channels(config.audio_channels)
        .output_arg("-movflags")
        .output_arg("+faststart")
        .log_level("error")
}

/// Transcode a video file to the web playback profile.
///
/// A non-zero exit or a failure to start the process is fatal to the job;
/// the returned error carries the exit code when one exists.
pub async fn transcode_web(
    runner: &dyn ProcessRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &EncodingConfig,
) -> MediaResult<()> {
    let cmd = transcode_command(input, output, config);
    runner.run(&cmd).await
}
