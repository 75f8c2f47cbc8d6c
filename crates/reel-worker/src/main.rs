//! Single-shot transcode worker binary.
//!
//! One invocation processes exactly one job. The job id comes from the
//! `JOB_ID` environment variable or the first CLI argument. Exit code 0
//! means the job completed; 1 means failure, including a missing id.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_media::{check_ffmpeg, FfmpegRunner};
use reel_models::JobId;
use reel_records::RecordsClient;
use reel_storage::{PublicUrlResolver, StorageClient, StorageConfig};
use reel_worker::{JobExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting reel-worker");

    let job_id = match job_id_from_env() {
        Some(id) => JobId::from(id),
        None => {
            error!("No job id supplied; set JOB_ID or pass it as the first argument");
            std::process::exit(1);
        }
    };

    // Load and validate configuration before touching any external system.
    let config = match WorkerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid worker configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = check_ffmpeg() {
        error!("FFmpeg preflight check failed: {}", e);
        std::process::exit(1);
    }

    let storage_config = match StorageConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid storage configuration: {}", e);
            std::process::exit(1);
        }
    };
    let urls = PublicUrlResolver::new(&storage_config);
    let storage = StorageClient::new(&storage_config);

    let records = match RecordsClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid records configuration: {}", e);
            std::process::exit(1);
        }
    };

    let executor = JobExecutor::new(
        config,
        Arc::new(records),
        Arc::new(storage),
        Arc::new(FfmpegRunner::new()),
        urls,
    );

    match executor.execute(&job_id).await {
        Ok(()) => info!(job_id = %job_id, "Job completed"),
        Err(e) => {
            error!(job_id = %job_id, "Job failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Job id from `JOB_ID` or the first CLI argument.
fn job_id_from_env() -> Option<String> {
    std::env::var("JOB_ID")
        .ok()
        .or_else(|| std::env::args().nth(1))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
