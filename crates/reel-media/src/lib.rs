//! FFmpeg CLI wrapper for the transcode worker.
//!
//! This crate provides:
//! - A builder for FFmpeg command lines
//! - A process runner behind the [`ProcessRunner`] trait
//! - Thumbnail extraction and web transcode profiles

pub mod command;
pub mod error;
pub mod thumbnail;
pub mod transcode;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner, ProcessRunner};
pub use error::{MediaError, MediaResult};
pub use thumbnail::{extract_thumbnail, thumbnail_command};
pub use transcode::{transcode_command, transcode_web};
