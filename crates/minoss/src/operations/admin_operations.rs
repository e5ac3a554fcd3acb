//! Quota, usage reporting and user management.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, error, info, instrument};

use crate::types::{
    AccountStatus, BucketQuota, BucketUsageInfo, DataUsageInfo, InfoMessage, ONE_MIB,
    StorageDetails, StorageInfo, StorageUsage,
};
use crate::{Error, MinossClient, Result, TRACING_TARGET_ADMIN};

/// Administrative operations bound to a [`MinossClient`].
///
/// The credentials must belong to a user with admin privileges.
#[derive(Debug, Clone)]
pub struct AdminOperations {
    client: MinossClient,
}

impl AdminOperations {
    pub fn new(client: MinossClient) -> Self {
        Self { client }
    }

    /// Returns the quota of a bucket in whole mebibytes.
    ///
    /// A bucket without a quota reports `0.0`.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN, fields(bucket = %bucket))]
    pub async fn get_quota(&self, bucket: &str) -> Result<f64> {
        let quota = self.client.admin_client().get_bucket_quota(bucket).await?;
        let mib = quota.mib() as f64;

        debug!(target: TRACING_TARGET_ADMIN, bucket, quota_mib = mib, "Bucket quota fetched");
        Ok(mib)
    }

    /// Sets a hard quota of `mib` mebibytes on a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for a negative size or one that
    /// overflows a byte count.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN, fields(bucket = %bucket))]
    pub async fn set_quota(&self, bucket: &str, mib: i64) -> Result<()> {
        let bytes = quota_bytes(mib)?;

        match self
            .client
            .admin_client()
            .set_bucket_quota(bucket, &BucketQuota::hard(bytes))
            .await
        {
            Ok(()) => {
                info!(target: TRACING_TARGET_ADMIN, bucket, quota_mib = mib, "Bucket quota set");
                Ok(())
            }
            Err(e) => {
                error!(target: TRACING_TARGET_ADMIN, bucket, error = %e, "Failed to set bucket quota");
                Err(e)
            }
        }
    }

    /// Returns per-bucket usage keyed by bucket name.
    pub async fn buckets_usage(&self) -> Result<HashMap<String, BucketUsageInfo>> {
        Ok(self.data_usage().await?.buckets_usage)
    }

    /// Returns the cluster-wide data usage report.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN)]
    pub async fn data_usage(&self) -> Result<DataUsageInfo> {
        let usage = self.client.admin_client().data_usage_info().await?;
        debug!(
            target: TRACING_TARGET_ADMIN,
            buckets = usage.buckets_count,
            objects = usage.objects_count,
            "Data usage fetched"
        );
        Ok(usage)
    }

    #[instrument(skip(self), target = TRACING_TARGET_ADMIN)]
    pub async fn server_info(&self) -> Result<InfoMessage> {
        self.client.admin_client().server_info().await
    }

    #[instrument(skip(self), target = TRACING_TARGET_ADMIN)]
    pub async fn storage_info(&self) -> Result<StorageInfo> {
        self.client.admin_client().storage_info().await
    }

    /// Returns the summed capacity of every drive in the cluster.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN)]
    pub async fn storage_usage(&self) -> Result<StorageUsage> {
        let info = self.storage_info().await?;
        let usage = StorageUsage::from_storage_info(&info);

        debug!(
            target: TRACING_TARGET_ADMIN,
            drives = info.disks.len(),
            total = usage.total,
            used = usage.used,
            available = usage.available,
            "Storage usage computed"
        );
        Ok(usage)
    }

    /// Returns drive status grouped by instance host.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN)]
    pub async fn storage_details(&self) -> Result<BTreeMap<String, StorageDetails>> {
        let info = self.server_info().await?;
        let details = StorageDetails::from_server_info(&info);

        debug!(
            target: TRACING_TARGET_ADMIN,
            servers = info.servers.len(),
            instances = details.len(),
            "Storage details computed"
        );
        Ok(details)
    }

    /// Deletes a user.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN, fields(access_key = %access_key))]
    pub async fn remove_user(&self, access_key: &str) -> Result<()> {
        self.client.admin_client().remove_user(access_key).await?;
        info!(target: TRACING_TARGET_ADMIN, access_key, "User removed");
        Ok(())
    }

    /// Enables or disables a user.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN, fields(access_key = %access_key))]
    pub async fn set_user_status(&self, access_key: &str, status: AccountStatus) -> Result<()> {
        self.client
            .admin_client()
            .set_user_status(access_key, status)
            .await?;
        info!(target: TRACING_TARGET_ADMIN, access_key, status = %status, "User status set");
        Ok(())
    }

    /// Attaches a canned policy to a user, or to a group when `is_group` is
    /// set.
    #[instrument(skip(self), target = TRACING_TARGET_ADMIN, fields(entity = %entity))]
    pub async fn set_policy(&self, entity: &str, policy_name: &str, is_group: bool) -> Result<()> {
        self.client
            .admin_client()
            .set_policy(policy_name, entity, is_group)
            .await?;
        info!(
            target: TRACING_TARGET_ADMIN,
            entity,
            policy = policy_name,
            is_group,
            "Policy attached"
        );
        Ok(())
    }
}

/// Converts a quota in mebibytes to bytes.
fn quota_bytes(mib: i64) -> Result<u64> {
    let mib = u64::try_from(mib)
        .map_err(|_| Error::InvalidRequest(format!("Quota cannot be negative: {mib}")))?;
    mib.checked_mul(ONE_MIB)
        .ok_or_else(|| Error::InvalidRequest(format!("Quota of {mib} MiB is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinossConfig, MinossCredentials};

    #[test]
    fn test_quota_bytes() {
        assert_eq!(quota_bytes(0).unwrap(), 0);
        assert_eq!(quota_bytes(5).unwrap(), 5 * 1024 * 1024);
        assert!(quota_bytes(-1).unwrap_err().is_invalid_request());
        assert!(quota_bytes(i64::MAX).unwrap_err().is_invalid_request());
    }

    #[test]
    fn test_quota_mib_truncates() {
        let quota = BucketQuota::hard(ONE_MIB * 3 + ONE_MIB / 2);
        assert_eq!(quota.mib() as f64, 3.0);
    }

    #[tokio::test]
    async fn test_set_negative_quota_fails_before_request() {
        let config = MinossConfig::new("127.0.0.1:1", MinossCredentials::new("a", "b"));
        let admin = MinossClient::new(config).unwrap().admin_operations();

        let err = admin.set_quota("bucket", -10).await.unwrap_err();
        assert!(err.is_invalid_request());
    }
}
