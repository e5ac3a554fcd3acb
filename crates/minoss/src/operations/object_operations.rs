//! Object listing and transfer operations.

use std::path::Path;

use futures::StreamExt;
use jiff::Timestamp;
use minio::s3::builders::ObjectContent;
use minio::s3::types::{S3Api, ToStream};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info, instrument, warn};

use crate::types::{
    GetObjectOptions, ObjectInfo, PutObjectOptions, RemoveObjectOptions, SearchResult,
    UploadResult,
};
use crate::{Error, MinossClient, Result, TRACING_TARGET_OBJECTS};

/// Part size used for multipart uploads of bodies with unknown length.
pub const DEFAULT_PART_SIZE: u64 = 16 * 1024 * 1024;

/// Object operations bound to a [`MinossClient`].
#[derive(Debug, Clone)]
pub struct ObjectOperations {
    client: MinossClient,
}

impl ObjectOperations {
    pub fn new(client: MinossClient) -> Self {
        Self { client }
    }

    /// Lists the top level of a bucket.
    ///
    /// Common prefixes are returned as entries with
    /// [`is_prefix`](ObjectInfo::is_prefix) set. A failing page ends the
    /// listing with a warning; entries gathered so far are returned.
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket))]
    pub async fn get_object_list(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        Ok(self.list(bucket, None, false).await)
    }

    /// Lists the objects under a prefix.
    ///
    /// Listing failures are handled as in
    /// [`get_object_list`](Self::get_object_list).
    #[instrument(skip(self), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket))]
    pub async fn search_objects(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> Result<SearchResult> {
        let prefix = Some(prefix).filter(|p| !p.is_empty());
        let objects = self.list(bucket, prefix, recursive).await;
        Ok(SearchResult::new(objects))
    }

    async fn list(&self, bucket: &str, prefix: Option<&str>, recursive: bool) -> Vec<ObjectInfo> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket,
            prefix = ?prefix,
            recursive,
            "Listing objects"
        );

        let start = std::time::Instant::now();

        let mut request = self.client.user_client().list_objects(bucket);
        if let Some(prefix) = prefix {
            request = request.prefix(Some(prefix.to_string()));
        }
        if !recursive {
            request = request.delimiter(Some("/".to_string()));
        }

        let mut stream = request.to_stream().await;
        let mut objects = Vec::new();

        while let Some(page) = stream.next().await {
            match page {
                Ok(response) => objects.extend(response.contents.into_iter().map(|entry| {
                    let mut info = ObjectInfo::new(entry.name, entry.size.unwrap_or(0) as u64)
                        .with_prefix(entry.is_prefix);
                    if let Some(modified) = entry
                        .last_modified
                        .and_then(|dt| Timestamp::from_second(dt.timestamp()).ok())
                    {
                        info = info.with_last_modified(modified);
                    }
                    if let Some(etag) = entry.etag {
                        info = info.with_etag(etag);
                    }
                    info
                })),
                Err(e) => {
                    warn!(
                        target: TRACING_TARGET_OBJECTS,
                        bucket,
                        error = %e,
                        listed = objects.len(),
                        "Listing page failed, returning partial listing"
                    );
                    break;
                }
            }
        }

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket,
            count = objects.len(),
            elapsed = ?start.elapsed(),
            "Objects listed"
        );

        objects
    }

    /// Uploads an object of unknown length from a reader.
    ///
    /// The body is sent in parts of [`DEFAULT_PART_SIZE`] bytes; a body
    /// shorter than one part goes out as a single request.
    #[instrument(skip(self, reader, options), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn upload_object<R>(
        &self,
        bucket: &str,
        key: &str,
        reader: R,
        options: Option<PutObjectOptions>,
    ) -> Result<UploadResult>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let content = ObjectContent::new_from_stream(ReaderStream::new(reader), None);
        self.put_content(
            bucket,
            key,
            content,
            Some(DEFAULT_PART_SIZE),
            options.unwrap_or_default(),
        )
        .await
    }

    /// Uploads a local file.
    #[instrument(skip(self, options), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn upload_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        options: Option<PutObjectOptions>,
    ) -> Result<UploadResult> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            error!(
                target: TRACING_TARGET_OBJECTS,
                path = %path.display(),
                error = %e,
                "Failed to open upload source"
            );
            Error::Io(e)
        })?;
        let size = file.metadata().await?.len();

        let content = ObjectContent::new_from_stream(ReaderStream::new(file), Some(size));
        self.put_content(bucket, key, content, None, options.unwrap_or_default())
            .await
    }

    async fn put_content(
        &self,
        bucket: &str,
        key: &str,
        content: ObjectContent,
        part_size: Option<u64>,
        options: PutObjectOptions,
    ) -> Result<UploadResult> {
        debug!(
            target: TRACING_TARGET_OBJECTS,
            bucket,
            key,
            content_type = %options.content_type,
            part_size = ?part_size,
            "Uploading object"
        );

        let start = std::time::Instant::now();
        let result = self
            .client
            .user_client()
            .put_object_content(bucket, key, content)
            .content_type(options.content_type)
            .part_size(part_size)
            .send()
            .await
            .map_err(Error::Client);
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket,
                    key,
                    etag = %response.etag,
                    elapsed = ?elapsed,
                    "Object uploaded"
                );
                Ok(UploadResult {
                    key: key.to_string(),
                    etag: response.etag,
                })
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket,
                    key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to upload object"
                );
                Err(e)
            }
        }
    }

    /// Streams an object into a writer and returns the number of bytes
    /// written.
    #[instrument(skip(self, writer, options), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn download_object<W>(
        &self,
        bucket: &str,
        key: &str,
        writer: &mut W,
        options: Option<GetObjectOptions>,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let options = options.unwrap_or_default();
        let start = std::time::Instant::now();

        let result = self
            .client
            .user_client()
            .get_object(bucket, key)
            .version_id(options.version_id)
            .offset(options.offset)
            .length(options.length)
            .send()
            .await
            .map_err(Error::Client);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket,
                    key,
                    error = %e,
                    "Failed to get object"
                );
                return Err(e);
            }
        };

        let (mut stream, _size) = response.content.to_stream().await?;
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;

        info!(
            target: TRACING_TARGET_OBJECTS,
            bucket,
            key,
            size = written,
            elapsed = ?start.elapsed(),
            "Object downloaded"
        );

        Ok(written)
    }

    /// Downloads an object into a local file, replacing it if present.
    ///
    /// The body is written to a temporary file next to `path` and renamed
    /// over it once complete, so a failed download leaves an existing file
    /// untouched.
    #[instrument(skip(self, options), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn download_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        options: Option<GetObjectOptions>,
    ) -> Result<u64> {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let staging = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            error!(
                target: TRACING_TARGET_OBJECTS,
                path = %path.display(),
                error = %e,
                "Failed to create download target"
            );
            Error::Io(e)
        })?;

        let mut file = tokio::fs::File::from_std(staging.reopen()?);
        let written = self.download_object(bucket, key, &mut file, options).await?;
        drop(file);

        staging.persist(path).map_err(|e| {
            error!(
                target: TRACING_TARGET_OBJECTS,
                path = %path.display(),
                error = %e.error,
                "Failed to move download into place"
            );
            Error::Io(e.error)
        })?;

        Ok(written)
    }

    /// Removes an object.
    ///
    /// Governance-mode retention is bypassed unless the options turn it off.
    #[instrument(skip(self, options), target = TRACING_TARGET_OBJECTS, fields(bucket = %bucket, key = %key))]
    pub async fn remove_object(
        &self,
        bucket: &str,
        key: &str,
        options: Option<RemoveObjectOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let start = std::time::Instant::now();

        let result = self
            .client
            .user_client()
            .delete_object(bucket, key)
            .bypass_governance_mode(options.governance_bypass)
            .send()
            .await
            .map_err(Error::Client);
        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                info!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket,
                    key,
                    elapsed = ?elapsed,
                    "Object removed"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    target: TRACING_TARGET_OBJECTS,
                    bucket,
                    key,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to remove object"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinossConfig, MinossCredentials};

    fn operations() -> ObjectOperations {
        let config = MinossConfig::new("127.0.0.1:1", MinossCredentials::new("a", "b"));
        MinossClient::new(config).unwrap().object_operations()
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");

        let err = operations()
            .upload_object_from_file("bucket", "key", &missing, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upload_of_unknown_length_sets_part_size() {
        let reader = std::io::Cursor::new(b"hello world".to_vec());

        let err = operations()
            .upload_object("bucket", "key", reader, None)
            .await
            .unwrap_err();
        assert!(!matches!(
            err,
            Error::Client(minio::s3::error::Error::MissingPartSize)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_download_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.csv");
        std::fs::write(&target, b"local contents").unwrap();

        operations()
            .download_object_to_file("bucket", "key", &target, None)
            .await
            .unwrap_err();

        assert_eq!(std::fs::read(&target).unwrap(), b"local contents");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_download_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("no-such-dir").join("out.bin");

        let err = operations()
            .download_object_to_file("bucket", "key", &target, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
