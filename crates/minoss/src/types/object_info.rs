//! Bucket and object listing entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name.
    pub name: String,
    /// Bucket creation date.
    pub creation_date: Option<Timestamp>,
}

impl BucketInfo {
    /// Creates a new BucketInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: None,
        }
    }

    /// Sets the creation date.
    pub fn with_creation_date(mut self, creation_date: Timestamp) -> Self {
        self.creation_date = Some(creation_date);
        self
    }
}

/// Information about an object, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object key/path.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: Option<Timestamp>,
    /// ETag of the object.
    pub etag: Option<String>,
    /// Whether this entry is a common prefix ("directory") of a
    /// non-recursive listing rather than an object.
    pub is_prefix: bool,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            etag: None,
            is_prefix: false,
        }
    }

    /// Sets the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Marks the entry as a common prefix.
    pub fn with_prefix(mut self, is_prefix: bool) -> Self {
        self.is_prefix = is_prefix;
        self
    }
}

/// Result of a prefix search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching entries.
    pub objects: Vec<ObjectInfo>,
    /// Number of matching entries.
    pub total: u64,
}

impl SearchResult {
    /// Builds a result from the collected entries.
    pub fn new(objects: Vec<ObjectInfo>) -> Self {
        let total = objects.len() as u64;
        Self { objects, total }
    }
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Object key/path that was uploaded.
    pub key: String,
    /// ETag of the uploaded object.
    pub etag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_counts_entries() {
        let result = SearchResult::new(vec![
            ObjectInfo::new("docs/", 0).with_prefix(true),
            ObjectInfo::new("README.md", 42).with_etag("abc"),
        ]);
        assert_eq!(result.total, 2);
        assert!(result.objects[0].is_prefix);
        assert_eq!(result.objects[1].etag.as_deref(), Some("abc"));

        assert_eq!(SearchResult::default().total, 0);
    }

    #[test]
    fn test_bucket_info_serialization() {
        let ts: Timestamp = "2024-03-01T12:00:00Z".parse().unwrap();
        let info = BucketInfo::new("minoss").with_creation_date(ts);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["name"], "minoss");
        assert_eq!(json["creation_date"], "2024-03-01T12:00:00Z");
    }
}
