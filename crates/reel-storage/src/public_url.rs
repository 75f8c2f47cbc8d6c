//! Public URL derivation for uploaded artifacts.

use crate::client::StorageConfig;

/// Derives public-facing URLs for storage keys.
///
/// Prefers a configured public domain; otherwise falls back to the storage
/// endpoint plus bucket name. Derivation is pure: the resolver is built once
/// from configuration and never performs I/O.
#[derive(Debug, Clone)]
pub struct PublicUrlResolver {
    base: String,
}

impl PublicUrlResolver {
    /// Build a resolver from storage configuration.
    pub fn new(config: &StorageConfig) -> Self {
        let base = match &config.public_base_url {
            Some(domain) => domain.clone(),
            None => format!(
                "{}/{}",
                config.endpoint_url.trim_end_matches('/'),
                config.bucket_name
            ),
        };
        Self { base }
    }

    /// Public URL for a storage key.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base, key.trim_start_matches('/'))
    }
}
