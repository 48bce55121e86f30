//! Bucket-keyed S3 object storage
//!
//! A [`BucketRegistry`] maps bucket names to per-bucket [`BucketClient`] handles
//! that share one static credential pair. The free functions in [`facade`]
//! resolve a bucket by name and forward uploads and presigned URL requests to it.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod client;
mod environment;
mod error;
pub mod facade;
mod registry;
pub mod store;

use chrono::{DateTime, Utc};

pub use aws_sdk_s3::primitives::ByteStream;
pub use client::BucketClient;
pub use environment::Environment;
pub use error::{BucketError, BucketResult};
pub use facade::{presigned_url, s3_key, upload, upload_data, upload_file, File};
pub use registry::{
    Bucket, BucketRegistry, BucketRegistryBuilder, RegistryOptions, DEFAULT_REGION,
    DEFAULT_SIGNED_URL_TTL,
};

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL for GET operations
    pub url: String,
    /// UTC timestamp after which the URL no longer grants access
    pub expires_at: DateTime<Utc>,
}
