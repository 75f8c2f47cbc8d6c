//! Object storage client implementation.

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Configuration for the object storage client.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region ("auto" for R2-style endpoints)
    pub region: String,
    /// Optional public domain fronting the bucket; used for artifact URLs
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let config = Self {
            endpoint_url: std::env::var("STORAGE_ENDPOINT_URL")
                .map_err(|_| StorageError::config_error("STORAGE_ENDPOINT_URL not set"))?,
            access_key_id: std::env::var("STORAGE_ACCESS_KEY_ID")
                .map_err(|_| StorageError::config_error("STORAGE_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("STORAGE_SECRET_ACCESS_KEY")
                .map_err(|_| StorageError::config_error("STORAGE_SECRET_ACCESS_KEY not set"))?,
            bucket_name: std::env::var("STORAGE_BUCKET")
                .map_err(|_| StorageError::config_error("STORAGE_BUCKET not set"))?,
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
            public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL").ok(),
        };
        config.validated()
    }

    /// Validate and normalize the configuration once, at load time.
    pub fn validated(mut self) -> StorageResult<Self> {
        if self.endpoint_url.trim().is_empty() {
            return Err(StorageError::config_error("endpoint URL cannot be empty"));
        }
        if self.bucket_name.trim().is_empty() {
            return Err(StorageError::config_error("bucket name cannot be empty"));
        }
        self.endpoint_url = self.endpoint_url.trim().trim_end_matches('/').to_string();
        self.public_base_url = self
            .public_base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        Ok(self)
    }
}

/// Abstraction over the object store consumed by the pipeline.
///
/// The production implementation is [`StorageClient`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream an object to a local file.
    async fn download_to_file(&self, key: &str, dest: &Path) -> StorageResult<()>;

    /// Upload a local file under the given key.
    async fn upload_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()>;
}

/// S3-compatible storage client.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    bucket: String,
}

impl StorageClient {
    /// Create a new storage client from configuration.
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "reel",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name.clone(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let config = StorageConfig::from_env()?;
        Ok(Self::new(&config))
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    /// Stream an object to a local file.
    ///
    /// The body is written chunk by chunk; source assets may be large and are
    /// never buffered whole in memory. The file is flushed and synced before
    /// returning, so a success return means the bytes are on disk.
    async fn download_to_file(&self, key: &str, dest: &Path) -> StorageResult<()> {
        debug!("Downloading {} to {}", key, dest.display());

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::not_found(key)
                } else {
                    StorageError::download_failed(service_err.to_string())
                }
            })?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut body = response.body;
        let mut file = tokio::fs::File::create(dest).await?;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::download_failed(e.to_string()))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        file.sync_all().await?;

        info!("Downloaded {} to {}", key, dest.display());
        Ok(())
    }

    /// Upload a local file under the given key.
    async fn upload_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()> {
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        info!("Uploaded {} to {}", path.display(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> StorageConfig {
        StorageConfig {
            endpoint_url: "https://storage.example.com/".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            bucket_name: "media".to_string(),
            region: "auto".to_string(),
            public_base_url: None,
        }
    }

    #[test]
    fn test_validated_normalizes_trailing_slash() {
        let config = base_config().validated().unwrap();
        assert_eq!(config.endpoint_url, "https://storage.example.com");
    }

    #[test]
    fn test_validated_rejects_empty_bucket() {
        let mut config = base_config();
        config.bucket_name = "  ".to_string();
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_validated_drops_empty_public_base() {
        let mut config = base_config();
        config.public_base_url = Some("".to_string());
        let config = config.validated().unwrap();
        assert!(config.public_base_url.is_none());
    }

    #[test]
    fn test_validated_trims_public_base() {
        let mut config = base_config();
        config.public_base_url = Some("https://cdn.example.com/".to_string());
        let config = config.validated().unwrap();
        assert_eq!(config.public_base_url.as_deref(), Some("https://cdn.example.com"));
    }
}
