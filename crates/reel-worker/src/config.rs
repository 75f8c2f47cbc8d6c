//! Worker configuration.

use std::path::PathBuf;

use reel_models::EncodingConfig;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root directory for per-job staging areas
    pub work_dir: PathBuf,
    /// Encoding profile for the web transcode
    pub encoding: EncodingConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/reel"),
            encoding: EncodingConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        let config = Self {
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/reel")),
            encoding: EncodingConfig::default(),
        };
        config.validated()
    }

    /// Validate the configuration once, at load time.
    pub fn validated(self) -> WorkerResult<Self> {
        if self.work_dir.as_os_str().is_empty() {
            return Err(WorkerError::config_error("work directory cannot be empty"));
        }
        Ok(self)
    }
}
