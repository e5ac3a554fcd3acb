//! Client owning the S3 and admin connections.

use std::sync::Arc;

use minio::s3::Client;
use minio::s3::creds::StaticProvider;
use minio::s3::types::S3Api;
use tracing::{debug, error, info, instrument};

use crate::admin::AdminClient;
use crate::operations::{AdminOperations, BucketOperations, ObjectOperations};
use crate::{Error, MinossConfig, Result, TRACING_TARGET_CLIENT};

/// Entry point of the library.
///
/// Holds the S3 client used for bucket and object calls together with the
/// [`AdminClient`] used for quota, usage and user management. Cloning is
/// cheap; clones share the configuration.
///
/// Requires a multi-threaded tokio runtime: the S3 client resolves bucket
/// regions with `tokio::task::block_in_place`, which panics on a
/// current-thread runtime.
#[derive(Clone)]
pub struct MinossClient {
    inner: Client,
    admin: AdminClient,
    config: Arc<MinossConfig>,
}

impl MinossClient {
    /// Creates a client without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or either underlying
    /// client cannot be built.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use minoss::{MinossClient, MinossConfig, MinossCredentials};
    ///
    /// let config = MinossConfig::new("localhost:9000", MinossCredentials::new("access", "secret"));
    /// let client = MinossClient::new(config).unwrap();
    /// assert_eq!(client.config().base_url(), "http://localhost:9000");
    /// ```
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_masked()))]
    pub fn new(config: MinossConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Configuration validation failed");
            e
        })?;

        let base_url = config.base_url().parse().map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Invalid endpoint URL");
            Error::Config(format!("Invalid endpoint URL: {e}"))
        })?;

        let provider = Box::new(StaticProvider::from(config.credentials()));
        let inner = Client::new(base_url, Some(provider), None, None).map_err(|e| {
            error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create S3 client");
            Error::Config(format!("Failed to build S3 client: {e}"))
        })?;

        let admin = AdminClient::new(&config)?;

        info!(
            target: TRACING_TARGET_CLIENT,
            secure = config.is_secure(),
            region = %config.region,
            access_key = %config.credentials().access_key_masked(),
            "Client initialized"
        );

        Ok(Self {
            inner,
            admin,
            config: Arc::new(config),
        })
    }

    /// Creates a client and makes sure the configured bucket exists.
    ///
    /// Without a configured bucket this is equivalent to [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the bucket cannot be
    /// checked or created.
    #[instrument(skip(config), target = TRACING_TARGET_CLIENT, fields(endpoint = %config.endpoint_masked()))]
    pub async fn connect(config: MinossConfig) -> Result<Self> {
        let client = Self::new(config)?;

        if let Some(bucket) = client.config.bucket() {
            debug!(target: TRACING_TARGET_CLIENT, bucket, "Ensuring configured bucket exists");
            client.bucket_operations().make_bucket(bucket).await?;
        }

        Ok(client)
    }

    /// Lists buckets to verify the server is reachable and accepts the
    /// credentials.
    #[instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn test_connection(&self) -> Result<()> {
        let start = std::time::Instant::now();
        let result = self.inner.list_buckets().send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                debug!(target: TRACING_TARGET_CLIENT, elapsed = ?elapsed, "Connection test successful");
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_CLIENT,
                    error = %e,
                    elapsed = ?elapsed,
                    "Connection test failed"
                );
                Err(Error::Client(e))
            }
        }
    }

    #[inline]
    pub fn config(&self) -> &MinossConfig {
        &self.config
    }

    /// Returns the underlying S3 client.
    #[inline]
    pub fn user_client(&self) -> &Client {
        &self.inner
    }

    #[inline]
    pub fn admin_client(&self) -> &AdminClient {
        &self.admin
    }

    pub fn bucket_operations(&self) -> BucketOperations {
        BucketOperations::new(self.clone())
    }

    pub fn object_operations(&self) -> ObjectOperations {
        ObjectOperations::new(self.clone())
    }

    pub fn admin_operations(&self) -> AdminOperations {
        AdminOperations::new(self.clone())
    }
}

impl std::fmt::Debug for MinossClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinossClient")
            .field("endpoint", &self.config.endpoint_masked())
            .field("secure", &self.config.is_secure())
            .field("region", &self.config.region)
            .field("bucket", &self.config.bucket())
            .field("access_key", &self.config.credentials().access_key_masked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MinossCredentials;

    fn test_config() -> MinossConfig {
        MinossConfig::new("localhost:9000", MinossCredentials::new("minioadmin", "minioadmin"))
    }

    #[test]
    fn test_client_creation() {
        let client = MinossClient::new(test_config()).unwrap();
        assert_eq!(client.config().host(), "localhost:9000");
        assert_eq!(
            client.admin_client().base_url().as_str(),
            "http://localhost:9000/"
        );
    }

    #[test]
    fn test_client_invalid_config() {
        let config = MinossConfig::new("localhost:9000", MinossCredentials::new("", ""));
        let result = MinossClient::new(config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_client_debug_masks_credentials() {
        let client = MinossClient::new(test_config().with_bucket("photos")).unwrap();
        let debug = format!("{client:?}");

        assert!(debug.contains("MinossClient"));
        assert!(debug.contains("localhost:9000"));
        assert!(debug.contains("photos"));
        assert!(!debug.contains("minioadmin"));
    }

    #[tokio::test]
    async fn test_connect_without_bucket_does_no_io() {
        // Nothing listens on this port; connect must not touch the network.
        let config = MinossConfig::new("127.0.0.1:1", MinossCredentials::new("a", "b"));
        let client = MinossClient::connect(config).await.unwrap();
        assert!(client.config().bucket().is_none());
    }
}
