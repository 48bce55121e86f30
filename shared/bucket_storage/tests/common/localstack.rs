use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use bucket_storage::{BucketRegistry, RegistryOptions, DEFAULT_SIGNED_URL_TTL};
use uuid::Uuid;

/// Test configuration for LocalStack
pub const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
pub const TEST_REGION: &str = "us-east-1";
pub const TEST_ACCESS_KEY: &str = "test";
pub const TEST_SECRET_KEY: &str = "test";

/// LocalStack buckets created for one test
///
/// Call [`Self::cleanup`] at the end of a test. `Drop` only spawns a detached
/// delete, which the test runtime may cancel before it runs.
pub struct LocalStackContext {
    pub registry: BucketRegistry,
    pub buckets: Vec<String>,
    pub s3_client: Arc<S3Client>,
}

impl LocalStackContext {
    /// Creates `count` uniquely named buckets and a registry over them
    pub async fn new(count: usize) -> Self {
        super::setup_test_env();

        let s3_client = Arc::new(localstack_s3_client().await);
        let buckets: Vec<String> = (0..count)
            .map(|_| format!("test-media-{}", Uuid::new_v4()))
            .collect();

        for bucket in &buckets {
            s3_client
                .create_bucket()
                .bucket(bucket)
                .send()
                .await
                .expect("Failed to create test bucket");
        }

        let registry = BucketRegistry::builder(TEST_ACCESS_KEY, TEST_SECRET_KEY)
            .buckets(buckets.iter().cloned())
            .options(localstack_options())
            .build()
            .await
            .expect("Failed to build registry");

        Self {
            registry,
            buckets,
            s3_client,
        }
    }

    pub fn bucket(&self, index: usize) -> &str {
        &self.buckets[index]
    }

    /// Reads an object directly through the S3 API
    pub async fn get_object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let output = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .ok()?;
        let bytes = output.body.collect().await.ok()?.into_bytes();
        Some(bytes.to_vec())
    }

    /// Deletes the test buckets and waits for the deletes to finish
    pub async fn cleanup(mut self) {
        let buckets = std::mem::take(&mut self.buckets);
        delete_buckets(self.s3_client.clone(), buckets).await;
    }
}

impl Drop for LocalStackContext {
    fn drop(&mut self) {
        // Best effort for tests that panic before calling `cleanup`
        let client = self.s3_client.clone();
        let buckets = std::mem::take(&mut self.buckets);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(delete_buckets(client, buckets));
        }
    }
}

/// Empties and deletes each bucket, ignoring errors
async fn delete_buckets(client: Arc<S3Client>, buckets: Vec<String>) {
    for bucket in buckets {
        if let Ok(listed) = client.list_objects_v2().bucket(&bucket).send().await {
            for object in listed.contents() {
                if let Some(key) = object.key() {
                    let _ = client
                        .delete_object()
                        .bucket(&bucket)
                        .key(key)
                        .send()
                        .await;
                }
            }
        }
        let _ = client.delete_bucket().bucket(&bucket).send().await;
    }
}

/// Registry options pointing at LocalStack
pub fn localstack_options() -> RegistryOptions {
    RegistryOptions {
        region: TEST_REGION.to_string(),
        signed_url_ttl: DEFAULT_SIGNED_URL_TTL,
        endpoint_url: Some(LOCALSTACK_ENDPOINT.to_string()),
        force_path_style: true,
    }
}

/// S3 client for test setup and verification
pub async fn localstack_s3_client() -> S3Client {
    let credentials =
        Credentials::new(TEST_ACCESS_KEY, TEST_SECRET_KEY, None, None, "localstack");
    let config = aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await;

    let s3_config: aws_sdk_s3::Config = (&config).into();
    S3Client::from_conf(s3_config.to_builder().force_path_style(true).build())
}

/// Downloads data from a presigned URL
pub async fn download_from_presigned_url(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
