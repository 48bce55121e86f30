//! Object store capability behind every bucket client
//!
//! [`S3ObjectStore`] forwards to the AWS SDK. [`InMemoryObjectStore`] keeps
//! objects in memory and is only compiled for tests and the `test-utils` feature.

#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod s3;

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryObjectStore;
pub use s3::S3ObjectStore;

use crate::{BucketResult, PresignedUrl};

/// Storage service operations used by bucket clients
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores the full byte stream under `key` in `bucket`, replacing any existing object
    async fn store(&self, bucket: &str, key: &str, body: ByteStream) -> BucketResult<()>;

    /// Produces a URL granting GET access to `key` in `bucket` for `ttl`
    async fn sign(&self, bucket: &str, key: &str, ttl: Duration) -> BucketResult<PresignedUrl>;
}
