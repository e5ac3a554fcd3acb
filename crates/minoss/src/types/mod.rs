//! Data types for storage operations.
//!
//! - [`region`]: region codes used when creating buckets
//! - [`policy`]: bucket policy documents
//! - [`options`]: per-request options and their defaults
//! - [`object_info`]: bucket and object listing entries
//! - [`admin`]: wire types of the MinIO admin API
//! - [`storage`]: usage reports aggregated from admin responses

pub mod admin;
pub mod object_info;
pub mod options;
pub mod policy;
pub mod region;
pub mod storage;

pub use admin::{
    AccountStatus, BackendInfo, BucketQuota, BucketUsageInfo, DataUsageInfo, Disk, InfoMessage,
    ONE_MIB, QuotaType, ServerProperties, StorageInfo,
};
pub use object_info::{BucketInfo, ObjectInfo, SearchResult, UploadResult};
pub use options::{GetObjectOptions, OCTET_STREAM, PutObjectOptions, RemoveObjectOptions};
pub use policy::{BucketPolicy, Effect, PolicyStatement, Principal, default_public_policy};
pub use region::Region;
pub use storage::{StorageDetails, StorageDisk, StorageUsage, instance_host};
