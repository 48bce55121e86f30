//! S3 object store implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    error::DisplayErrorContext, presigning::PresigningConfig, primitives::ByteStream,
    Client as S3Client,
};
use chrono::Utc;
use tracing::{debug, error};

use super::ObjectStore;
use crate::{
    registry::validate_signed_url_ttl, BucketError, BucketResult, PresignedUrl, RegistryOptions,
};

const CREDENTIALS_PROVIDER_NAME: &str = "bucket-storage-static";

/// Object store backed by the AWS SDK S3 client
#[derive(Clone)]
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
}

impl S3ObjectStore {
    /// Wraps a pre-configured S3 client
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }

    /// Builds an S3 client from the ambient AWS configuration with the region,
    /// static credentials and endpoint taken from `options`
    ///
    /// SDK retries are disabled, a failed request surfaces on the first attempt.
    pub async fn connect(access_key: &str, secret_key: &str, options: &RegistryOptions) -> Self {
        let credentials = Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(options.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint_url) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let aws_config = loader.load().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();
        builder.set_force_path_style(Some(options.force_path_style));

        Self::new(Arc::new(S3Client::from_conf(builder.build())))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn store(&self, bucket: &str, key: &str, body: ByteStream) -> BucketResult<()> {
        debug!(bucket, key, "Uploading object");

        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let err = BucketError::from(e);
                error!(bucket, key, error = %err, "S3 upload failed");
                err
            })?;

        Ok(())
    }

    async fn sign(&self, bucket: &str, key: &str, ttl: Duration) -> BucketResult<PresignedUrl> {
        validate_signed_url_ttl(ttl)?;
        let presigned_config = PresigningConfig::expires_in(ttl).map_err(|e| {
            BucketError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        // Taken before signing so the reported expiry never trails the real one
        let signed_at = Utc::now();

        let presigned_url = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigned_config)
            .await
            .map_err(|e| {
                error!(
                    bucket,
                    key,
                    "Failed to generate presigned URL: {}",
                    DisplayErrorContext(&e)
                );
                BucketError::S3Error(format!(
                    "Failed to generate presigned URL: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let expires_at = signed_at + ttl;

        debug!(bucket, key, %expires_at, "Generated presigned URL");

        Ok(PresignedUrl {
            url: presigned_url.uri().to_string(),
            expires_at,
        })
    }
}
