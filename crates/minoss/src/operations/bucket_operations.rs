//! Bucket lifecycle and policy operations.

use jiff::Timestamp;
use minio::s3::types::S3Api;
use tracing::{debug, error, info, instrument};

use crate::types::{BucketInfo, default_public_policy};
use crate::{Error, MinossClient, Result, TRACING_TARGET_BUCKETS};

/// Bucket operations bound to a [`MinossClient`].
#[derive(Debug, Clone)]
pub struct BucketOperations {
    client: MinossClient,
}

impl BucketOperations {
    pub fn new(client: MinossClient) -> Self {
        Self { client }
    }

    /// Lists every bucket visible to the credentials.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS)]
    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        debug!(target: TRACING_TARGET_BUCKETS, "Listing buckets");

        let start = std::time::Instant::now();
        let result = self
            .client
            .user_client()
            .list_buckets()
            .send()
            .await
            .map_err(Error::Client);
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let buckets: Vec<BucketInfo> = response
                    .buckets
                    .into_iter()
                    .map(|bucket| {
                        let info = BucketInfo::new(bucket.name);
                        match Timestamp::from_second(bucket.creation_date.timestamp()) {
                            Ok(created) => info.with_creation_date(created),
                            Err(_) => info,
                        }
                    })
                    .collect();

                info!(
                    target: TRACING_TARGET_BUCKETS,
                    count = buckets.len(),
                    elapsed = ?elapsed,
                    "Buckets listed"
                );
                Ok(buckets)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to list buckets"
                );
                Err(e)
            }
        }
    }

    /// Checks whether a bucket exists.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let result = self
            .client
            .user_client()
            .bucket_exists(bucket)
            .send()
            .await
            .map_err(Error::Client);

        match result {
            Ok(response) => {
                debug!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    exists = response.exists,
                    "Bucket existence checked"
                );
                Ok(response.exists)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    error = %e,
                    "Failed to check bucket existence"
                );
                Err(e)
            }
        }
    }

    /// Creates a bucket unless it already exists.
    ///
    /// New buckets are created in the configured region with object locking
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for an empty name, otherwise the
    /// error of the existence check or the creation call.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    pub async fn make_bucket(&self, bucket: &str) -> Result<()> {
        if bucket.is_empty() {
            return Err(Error::InvalidRequest(
                "Bucket name cannot be empty".to_string(),
            ));
        }

        if self.bucket_exists(bucket).await? {
            debug!(target: TRACING_TARGET_BUCKETS, bucket, "Bucket already exists");
            return Ok(());
        }

        let region = self.client.config().region;
        let start = std::time::Instant::now();
        let result = self
            .client
            .user_client()
            .create_bucket(bucket)
            .region(Some(region.to_string()))
            .object_lock(true)
            .send()
            .await
            .map_err(Error::Client);
        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                info!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    region = %region,
                    elapsed = ?elapsed,
                    "Bucket created"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to create bucket"
                );
                Err(e)
            }
        }
    }

    /// Returns the policy document of a bucket as JSON text.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    pub async fn get_bucket_policy(&self, bucket: &str) -> Result<String> {
        let result = self
            .client
            .user_client()
            .get_bucket_policy(bucket)
            .send()
            .await
            .map_err(Error::Client);

        match result {
            Ok(response) => {
                debug!(target: TRACING_TARGET_BUCKETS, bucket, "Bucket policy fetched");
                Ok(response.config)
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    error = %e,
                    "Failed to get bucket policy"
                );
                Err(e)
            }
        }
    }

    /// Replaces the policy document of a bucket.
    #[instrument(skip(self, policy), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    pub async fn set_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        let result = self
            .client
            .user_client()
            .put_bucket_policy(bucket)
            .config(policy.to_string())
            .send()
            .await
            .map_err(Error::Client);

        match result {
            Ok(_) => {
                info!(target: TRACING_TARGET_BUCKETS, bucket, "Bucket policy set");
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    error = %e,
                    "Failed to set bucket policy"
                );
                Err(e)
            }
        }
    }

    /// Removes the policy document of a bucket.
    #[instrument(skip(self), target = TRACING_TARGET_BUCKETS, fields(bucket = %bucket))]
    pub async fn remove_bucket_policy(&self, bucket: &str) -> Result<()> {
        let result = self
            .client
            .user_client()
            .delete_bucket_policy(bucket)
            .send()
            .await
            .map_err(Error::Client);

        match result {
            Ok(_) => {
                info!(target: TRACING_TARGET_BUCKETS, bucket, "Bucket policy removed");
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_BUCKETS,
                    bucket,
                    error = %e,
                    "Failed to remove bucket policy"
                );
                Err(e)
            }
        }
    }

    /// Grants anonymous read-only access to a bucket and its objects.
    pub async fn set_bucket_public_policy(&self, bucket: &str) -> Result<()> {
        let policy = default_public_policy(bucket)?;
        self.set_bucket_policy(bucket, &policy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinossConfig, MinossCredentials};

    fn operations() -> BucketOperations {
        let config = MinossConfig::new("127.0.0.1:1", MinossCredentials::new("a", "b"));
        MinossClient::new(config).unwrap().bucket_operations()
    }

    #[tokio::test]
    async fn test_make_bucket_rejects_empty_name() {
        let err = operations().make_bucket("").await.unwrap_err();
        assert!(err.is_invalid_request());
    }
}
