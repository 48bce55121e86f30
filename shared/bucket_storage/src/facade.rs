//! Bucket-keyed upload and presigned URL operations
//!
//! Every function resolves the bucket in the registry first and fails with
//! `BucketError::UnknownBucket` before any request is made if it is missing.

use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::{Bucket, BucketRegistry, BucketResult, PresignedUrl};

/// An upload request held entirely in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Destination bucket
    pub bucket: Bucket,
    /// Folder part of the object key
    pub folder: String,
    /// File name part of the object key
    pub name: String,
    /// Object content
    pub data: Vec<u8>,
}

impl File {
    /// The object key this file is stored under
    #[must_use]
    pub fn s3_key(&self) -> String {
        s3_key(&self.folder, &self.name)
    }
}

/// Joins a folder and a file name into an object key
#[must_use]
pub fn s3_key(folder: &str, filename: &str) -> String {
    format!("{folder}/{filename}")
}

/// Uploads `body` to `bucket` under `folder/filename`
///
/// # Returns
///
/// The object key the content was stored under
///
/// # Errors
///
/// Returns `BucketError::UnknownBucket` if `bucket` was not registered,
/// otherwise any error from the upload itself
pub async fn upload_file(
    registry: &BucketRegistry,
    bucket: &str,
    folder: &str,
    filename: &str,
    body: ByteStream,
) -> BucketResult<String> {
    let client = registry.client(bucket)?;
    let key = s3_key(folder, filename);
    client.upload(body, &key).await?;
    debug!(bucket, key = %key, "Uploaded file");
    Ok(key)
}

/// Uploads `body` to `bucket` under the caller-supplied `key`
///
/// # Returns
///
/// The object key the content was stored under, same as [`upload_file`]
///
/// # Errors
///
/// Returns `BucketError::UnknownBucket` if `bucket` was not registered,
/// otherwise any error from the upload itself
pub async fn upload(
    registry: &BucketRegistry,
    bucket: &str,
    key: &str,
    body: ByteStream,
) -> BucketResult<String> {
    registry.client(bucket)?.upload(body, key).await?;
    debug!(bucket, key, "Uploaded object");
    Ok(key.to_string())
}

/// Uploads an in-memory [`File`]
///
/// # Errors
///
/// Returns `BucketError::UnknownBucket` if the file's bucket was not registered,
/// otherwise any error from the upload itself
pub async fn upload_data(registry: &BucketRegistry, file: File) -> BucketResult<String> {
    let File {
        bucket,
        folder,
        name,
        data,
    } = file;
    upload_file(
        registry,
        bucket.as_str(),
        &folder,
        &name,
        ByteStream::from(data),
    )
    .await
}

/// Generates a presigned GET URL for `key` in `bucket`
///
/// # Errors
///
/// Returns `BucketError::UnknownBucket` if `bucket` was not registered,
/// otherwise any error from presigning
pub async fn presigned_url(
    registry: &BucketRegistry,
    bucket: &str,
    key: &str,
) -> BucketResult<PresignedUrl> {
    registry.client(bucket)?.presigned_url(key).await
}
