//! Wire types of the MinIO admin API.
//!
//! Field names follow the JSON the server emits. Every field is defaulted:
//! server releases add and drop fields freely and the reports built on top
//! only need a handful of them.

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Number of bytes in one mebibyte.
pub const ONE_MIB: u64 = 1024 * 1024;

/// Kind of bucket quota.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuotaType {
    /// Writes beyond the quota are rejected.
    #[default]
    Hard,
}

/// Bucket quota configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketQuota {
    /// Quota in bytes, as understood by older servers.
    #[serde(default)]
    pub quota: u64,
    /// Quota in bytes.
    #[serde(default)]
    pub size: u64,
    /// Quota kind.
    #[serde(rename = "quotatype", default)]
    pub quota_type: QuotaType,
}

impl BucketQuota {
    /// Creates a hard quota of the given size in bytes.
    pub fn hard(bytes: u64) -> Self {
        Self {
            quota: bytes,
            size: bytes,
            quota_type: QuotaType::Hard,
        }
    }

    /// Returns the quota in bytes, whichever field the server filled in.
    pub fn bytes(&self) -> u64 {
        if self.size != 0 { self.size } else { self.quota }
    }

    /// Returns the quota in whole mebibytes.
    pub fn mib(&self) -> u64 {
        self.bytes() / ONE_MIB
    }
}

/// Status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccountStatus {
    /// The account may authenticate.
    Enabled,
    /// The account is locked out.
    Disabled,
}

/// Usage of a single bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketUsageInfo {
    /// Total size of the bucket's objects in bytes.
    #[serde(default)]
    pub size: u64,
    /// Number of objects.
    #[serde(default)]
    pub objects_count: u64,
    /// Number of object versions.
    #[serde(default)]
    pub versions_count: u64,
    /// Object count per size bucket, e.g. `BETWEEN_1024_B_AND_1_MB`.
    #[serde(rename = "objectsSizesHistogram", default)]
    pub objects_sizes_histogram: HashMap<String, u64>,
}

/// Cluster-wide data usage as computed by the server's scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUsageInfo {
    /// When the scanner last refreshed these figures.
    #[serde(default)]
    pub last_update: Option<Timestamp>,
    /// Number of objects across all buckets.
    #[serde(default)]
    pub objects_count: u64,
    /// Total object size across all buckets in bytes.
    #[serde(default)]
    pub objects_total_size: u64,
    /// Number of buckets.
    #[serde(default)]
    pub buckets_count: u64,
    /// Per-bucket usage.
    #[serde(rename = "bucketsUsageInfo", default)]
    pub buckets_usage: HashMap<String, BucketUsageInfo>,
    /// Per-bucket total size in bytes.
    #[serde(default)]
    pub buckets_sizes: HashMap<String, u64>,
}

/// A single drive as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    #[serde(default)]
    pub endpoint: String,
    #[serde(rename = "rootDisk", default)]
    pub root_disk: bool,
    /// Mount path of the drive.
    #[serde(rename = "path", default)]
    pub drive_path: String,
    #[serde(default)]
    pub healing: bool,
    /// Drive state, `ok` when online.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub model: String,
    #[serde(rename = "totalspace", default)]
    pub total_space: u64,
    #[serde(rename = "usedspace", default)]
    pub used_space: u64,
    #[serde(rename = "availspace", default)]
    pub available_space: u64,
    #[serde(default)]
    pub pool_index: i32,
    #[serde(default)]
    pub set_index: i32,
    #[serde(default)]
    pub disk_index: i32,
}

impl Disk {
    /// State string of an online drive.
    pub const STATE_OK: &'static str = "ok";

    /// Returns whether the drive is online.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.state == Self::STATE_OK
    }
}

/// Erasure backend summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Online drive count per endpoint.
    #[serde(rename = "OnlineDisks", default)]
    pub online_disks: HashMap<String, u64>,
    /// Offline drive count per endpoint.
    #[serde(rename = "OfflineDisks", default)]
    pub offline_disks: HashMap<String, u64>,
    /// Parity drives of the standard storage class.
    #[serde(rename = "StandardSCParity", default)]
    pub standard_sc_parity: u64,
    /// Parity drives of the reduced redundancy storage class.
    #[serde(rename = "RRSCParity", default)]
    pub rr_sc_parity: u64,
}

/// Response of the `storageinfo` admin API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    #[serde(rename = "Disks", default)]
    pub disks: Vec<Disk>,
    #[serde(rename = "Backend", default)]
    pub backend: BackendInfo,
}

/// Properties of one server in the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProperties {
    /// Server state, `online` or `offline`.
    #[serde(default)]
    pub state: String,
    /// `host:port` the server listens on.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub scheme: String,
    /// Uptime in seconds.
    #[serde(default)]
    pub uptime: i64,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "commitID", default)]
    pub commit_id: String,
    /// Reachability of peers, keyed by endpoint.
    #[serde(default)]
    pub network: HashMap<String, String>,
    #[serde(rename = "drives", default)]
    pub disks: Vec<Disk>,
    #[serde(rename = "poolNumber", default)]
    pub pool_number: i32,
}

/// Count wrapper used by the `info` admin API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    #[serde(default)]
    pub count: u64,
}

/// Size wrapper used by the `info` admin API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub size: u64,
}

/// Response of the `info` admin API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoMessage {
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "deploymentID", default)]
    pub deployment_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub buckets: Count,
    #[serde(default)]
    pub objects: Count,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub servers: Vec<ServerProperties>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_quota_decoding() {
        let legacy: BucketQuota =
            serde_json::from_str(r#"{"quota": 10485760, "quotatype": "hard"}"#).unwrap();
        assert_eq!(legacy.bytes(), 10 * ONE_MIB);
        assert_eq!(legacy.mib(), 10);

        let current: BucketQuota =
            serde_json::from_str(r#"{"quota": 0, "size": 3145728, "quotatype": "hard"}"#)
                .unwrap();
        assert_eq!(current.mib(), 3);
    }

    #[test]
    fn test_bucket_quota_mib_truncates() {
        let quota = BucketQuota::hard(ONE_MIB + ONE_MIB / 2);
        assert_eq!(quota.mib(), 1);
    }

    #[test]
    fn test_bucket_quota_encoding() {
        let json = serde_json::to_value(BucketQuota::hard(5 * ONE_MIB)).unwrap();
        assert_eq!(json["quota"], 5 * ONE_MIB);
        assert_eq!(json["size"], 5 * ONE_MIB);
        assert_eq!(json["quotatype"], "hard");
    }

    #[test]
    fn test_account_status_strings() {
        assert_eq!(AccountStatus::Enabled.as_ref(), "enabled");
        assert_eq!(AccountStatus::Disabled.to_string(), "disabled");
        assert_eq!(
            "disabled".parse::<AccountStatus>().unwrap(),
            AccountStatus::Disabled
        );
    }

    #[test]
    fn test_data_usage_decoding() {
        let json = r#"{
            "lastUpdate": "2024-05-01T10:00:00Z",
            "objectsCount": 3,
            "objectsTotalSize": 4096,
            "bucketsCount": 2,
            "bucketsUsageInfo": {
                "photos": {"size": 4000, "objectsCount": 2, "versionsCount": 2,
                           "objectsSizesHistogram": {"LESS_THAN_1024_B": 0}},
                "logs": {"size": 96, "objectsCount": 1}
            },
            "bucketsSizes": {"photos": 4000, "logs": 96},
            "tierStats": {"STANDARD": {}}
        }"#;

        let usage: DataUsageInfo = serde_json::from_str(json).unwrap();
        assert_eq!(usage.objects_count, 3);
        assert_eq!(usage.buckets_count, 2);
        assert_eq!(usage.buckets_usage["photos"].objects_count, 2);
        assert_eq!(usage.buckets_usage["logs"].versions_count, 0);
        assert_eq!(usage.buckets_sizes["logs"], 96);
        assert!(usage.last_update.is_some());
    }

    #[test]
    fn test_storage_info_decoding() {
        let json = r#"{
            "Disks": [
                {"endpoint": "http://node1:9000/data1", "path": "/data1", "state": "ok",
                 "uuid": "d1", "totalspace": 100, "usedspace": 40, "availspace": 60},
                {"endpoint": "http://node1:9000/data2", "path": "/data2", "state": "offline"}
            ],
            "Backend": {"Type": 1, "OnlineDisks": {"node1:9000": 1},
                        "OfflineDisks": {"node1:9000": 1}, "StandardSCParity": 2}
        }"#;

        let info: StorageInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.disks.len(), 2);
        assert!(info.disks[0].is_ok());
        assert!(!info.disks[1].is_ok());
        assert_eq!(info.disks[0].drive_path, "/data1");
        assert_eq!(info.disks[1].total_space, 0);
        assert_eq!(info.backend.standard_sc_parity, 2);
    }

    #[test]
    fn test_info_message_decoding() {
        let json = r#"{
            "mode": "online",
            "deploymentID": "abc",
            "buckets": {"count": 4},
            "objects": {"count": 10},
            "usage": {"size": 2048},
            "servers": [{
                "state": "online",
                "endpoint": "node1:9000",
                "uptime": 3600,
                "version": "2024-05-01T00-00-00Z",
                "commitID": "deadbeef",
                "network": {"node1:9000": "online"},
                "drives": [{"path": "/data1", "state": "ok", "uuid": "d1"}],
                "poolNumber": 1
            }]
        }"#;

        let info: InfoMessage = serde_json::from_str(json).unwrap();
        assert_eq!(info.buckets.count, 4);
        assert_eq!(info.usage.size, 2048);
        assert_eq!(info.servers[0].endpoint, "node1:9000");
        assert_eq!(info.servers[0].disks[0].uuid, "d1");
        assert_eq!(info.servers[0].commit_id, "deadbeef");
    }
}
