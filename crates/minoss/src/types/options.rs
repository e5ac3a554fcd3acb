//! Per-request options for object operations.
//!
//! Every object operation takes an `Option<...Options>`; passing `None`
//! applies the `Default` value defined here.

use serde::{Deserialize, Serialize};

/// Content type applied to uploads that do not specify one.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Options for uploading an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutObjectOptions {
    /// MIME type stored with the object.
    pub content_type: String,
}

impl Default for PutObjectOptions {
    fn default() -> Self {
        Self {
            content_type: OCTET_STREAM.to_string(),
        }
    }
}

impl PutObjectOptions {
    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Options for downloading an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetObjectOptions {
    /// Specific object version to fetch.
    pub version_id: Option<String>,
    /// Byte offset to start reading from.
    pub offset: Option<u64>,
    /// Number of bytes to read.
    pub length: Option<u64>,
}

impl GetObjectOptions {
    /// Requests a specific version of the object.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Requests a byte range of the object.
    pub fn with_range(mut self, offset: u64, length: u64) -> Self {
        self.offset = Some(offset);
        self.length = Some(length);
        self
    }
}

/// Options for removing an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveObjectOptions {
    /// Bypass governance-mode object locks.
    ///
    /// Buckets are created with object locking enabled, so removal bypasses
    /// governance retention unless told otherwise.
    pub governance_bypass: bool,
}

impl Default for RemoveObjectOptions {
    fn default() -> Self {
        Self {
            governance_bypass: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(PutObjectOptions::default().content_type, OCTET_STREAM);
        assert_eq!(GetObjectOptions::default(), GetObjectOptions {
            version_id: None,
            offset: None,
            length: None,
        });
        assert!(RemoveObjectOptions::default().governance_bypass);
    }

    #[test]
    fn test_builders() {
        let put = PutObjectOptions::default().with_content_type("text/markdown");
        assert_eq!(put.content_type, "text/markdown");

        let get = GetObjectOptions::default()
            .with_version_id("v1")
            .with_range(10, 20);
        assert_eq!(get.version_id.as_deref(), Some("v1"));
        assert_eq!(get.offset, Some(10));
        assert_eq!(get.length, Some(20));
    }
}
