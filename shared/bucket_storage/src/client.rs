//! Per-bucket client handle

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::primitives::ByteStream;

use crate::{store::ObjectStore, Bucket, BucketResult, PresignedUrl};

/// Client handle bound to a single bucket
pub struct BucketClient {
    store: Arc<dyn ObjectStore>,
    bucket: Bucket,
    signed_url_ttl: Duration,
}

impl BucketClient {
    pub(crate) fn new(
        store: Arc<dyn ObjectStore>,
        bucket: Bucket,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            store,
            bucket,
            signed_url_ttl,
        }
    }

    /// The bucket this client writes to and signs for
    #[must_use]
    pub const fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Lifetime of the URLs produced by [`Self::presigned_url`]
    #[must_use]
    pub const fn signed_url_ttl(&self) -> Duration {
        self.signed_url_ttl
    }

    /// Uploads the full byte stream under `key`
    ///
    /// An existing object at `key` is replaced.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::UpstreamError` for 5xx responses
    /// Returns `BucketError::S3Error` for other S3 service errors
    /// Returns `BucketError::AwsError` if the request could not be sent
    pub async fn upload(&self, body: ByteStream, key: &str) -> BucketResult<()> {
        self.store.store(self.bucket.as_str(), key, body).await
    }

    /// Generates a presigned GET URL for `key`, valid for the configured TTL
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` if presigned URL generation fails
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    pub async fn presigned_url(&self, key: &str) -> BucketResult<PresignedUrl> {
        self.store
            .sign(self.bucket.as_str(), key, self.signed_url_ttl)
            .await
    }
}

impl fmt::Debug for BucketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketClient")
            .field("bucket", &self.bucket)
            .field("signed_url_ttl", &self.signed_url_ttl)
            .finish_non_exhaustive()
    }
}
