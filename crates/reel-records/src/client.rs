//! Record store REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use reel_models::{Job, JobId, JobUpdate};

use crate::error::{RecordsError, RecordsResult};

/// Record store client configuration.
#[derive(Debug, Clone)]
pub struct RecordsConfig {
    /// Base URL of the records API
    pub base_url: String,
    /// Bearer token for authentication
    pub api_token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl RecordsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> RecordsResult<Self> {
        let base_url = std::env::var("RECORDS_API_URL")
            .map_err(|_| RecordsError::config_error("RECORDS_API_URL not set"))?;

        let timeout_secs: u64 = std::env::var("RECORDS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let connect_timeout_secs: u64 = std::env::var("RECORDS_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let config = Self {
            base_url,
            api_token: std::env::var("RECORDS_API_TOKEN").ok(),
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        };
        config.validated()
    }

    /// Validate and normalize the configuration once, at load time.
    pub fn validated(mut self) -> RecordsResult<Self> {
        if self.base_url.trim().is_empty() {
            return Err(RecordsError::config_error("records API URL cannot be empty"));
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Abstraction over the record store consumed by the job state controller.
///
/// The production implementation is [`RecordsClient`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Load a job record by id.
    async fn load_job(&self, id: &JobId) -> RecordsResult<Job>;

    /// Apply a partial update to a job record.
    async fn update_job(&self, id: &JobId, update: &JobUpdate) -> RecordsResult<()>;
}

/// Record store REST API client.
#[derive(Clone)]
pub struct RecordsClient {
    http: Client,
    config: RecordsConfig,
}

impl RecordsClient {
    /// Create a new records client.
    pub fn new(config: RecordsConfig) -> RecordsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("reel-records/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RecordsError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> RecordsResult<Self> {
        let config = RecordsConfig::from_env()?;
        Self::new(config)
    }

    fn job_url(&self, id: &JobId) -> String {
        format!(
            "{}/jobs/{}",
            self.config.base_url,
            urlencoding::encode(id.as_str())
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl JobStore for RecordsClient {
    async fn load_job(&self, id: &JobId) -> RecordsResult<Job> {
        let url = self.job_url(id);
        debug!(job_id = %id, "Loading job record");

        let response = self.authorize(self.http.get(&url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RecordsError::not_found(id.as_str())),
            status if status.is_success() => {
                let job = response
                    .json::<Job>()
                    .await
                    .map_err(|e| RecordsError::invalid_response(e.to_string()))?;
                Ok(job)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RecordsError::request_failed(format!(
                    "GET {} returned {}: {}",
                    url, status, body
                )))
            }
        }
    }

    async fn update_job(&self, id: &JobId, update: &JobUpdate) -> RecordsResult<()> {
        let url = self.job_url(id);
        debug!(job_id = %id, status = %update.status, "Updating job record");

        let response = self
            .authorize(self.http.patch(&url))
            .json(update)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RecordsError::not_found(id.as_str())),
            status if status.is_success() => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RecordsError::request_failed(format!(
                    "PATCH {} returned {}: {}",
                    url, status, body
                )))
            }
        }
    }
}
