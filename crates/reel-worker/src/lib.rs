//! Single-shot media transcode worker.
//!
//! This crate provides:
//! - Job state controller driving the record store lifecycle
//! - Staging area management with unconditional cleanup
//! - The fetch → transcode → publish pipeline
//! - Structured job logging

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod pipeline;
pub mod staging;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
pub use pipeline::{run_pipeline, PipelineContext, PipelineOutcome};
pub use staging::StagingArea;
