#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![allow(clippy::result_large_err, clippy::large_enum_variant)]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "minoss::client";
pub const TRACING_TARGET_BUCKETS: &str = "minoss::buckets";
pub const TRACING_TARGET_OBJECTS: &str = "minoss::objects";
pub const TRACING_TARGET_ADMIN: &str = "minoss::admin";

pub mod admin;
pub mod client;
pub mod operations;
pub mod types;

// Re-export for convenience
pub use crate::admin::AdminClient;
pub use crate::client::{MinossClient, MinossConfig, MinossCredentials};
pub use crate::operations::{AdminOperations, BucketOperations, ObjectOperations};
pub use crate::types::{
    AccountStatus, BucketInfo, BucketPolicy, BucketQuota, BucketUsageInfo, DataUsageInfo, Disk,
    Effect, GetObjectOptions, InfoMessage, ObjectInfo, PolicyStatement, PutObjectOptions,
    QuotaType, Region, RemoveObjectOptions, SearchResult, ServerProperties, StorageDetails,
    StorageDisk, StorageInfo, StorageUsage, UploadResult,
};

/// Error type for object storage and admin operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Invalid endpoint, empty credentials, zero timeouts, or a client that
    /// could not be built from the configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The admin API answered with a non-success status.
    #[error("Admin API error: {code}: {message} (status: {status_code})")]
    Admin {
        /// HTTP status code.
        status_code: u16,
        /// MinIO error code, e.g. `XMinioAdminNoSuchUser`.
        code: String,
        /// Human readable message from the server.
        message: String,
    },

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O operation failed.
    ///
    /// This includes local file access and stream reading/writing failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error from the admin client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Underlying MinIO client error.
    ///
    /// Errors from the object storage SDK are passed through untranslated.
    #[error("MinIO client error: {0}")]
    Client(#[from] minio::s3::error::Error),
}

impl Error {
    /// Returns whether this error indicates a configuration issue.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Returns whether this error indicates invalid request data.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }

    /// Returns whether this error indicates a missing resource.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Admin { status_code, .. } => *status_code == 404,
            _ => false,
        }
    }

    /// Returns the HTTP status code when the server reported one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Admin { status_code, .. } => Some(*status_code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Specialized [`Result`] type for storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::Config("x".into()).is_config_error());
        assert!(Error::InvalidRequest("x".into()).is_invalid_request());
        assert!(Error::NotFound("x".into()).is_not_found());

        let admin = Error::Admin {
            status_code: 404,
            code: "XMinioAdminNoSuchUser".into(),
            message: "The specified user does not exist".into(),
        };
        assert!(admin.is_not_found());
        assert_eq!(admin.status_code(), Some(404));
        assert!(admin.to_string().contains("XMinioAdminNoSuchUser"));
    }

    #[test]
    fn test_error_from_io() {
        let err: Error = std::io::Error::other("boom").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.status_code(), None);
    }
}
