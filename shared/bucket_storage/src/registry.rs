//! Bucket registry: one client handle per registered bucket

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::{
    store::{ObjectStore, S3ObjectStore},
    BucketClient, BucketError, BucketResult,
};

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-west-2";

/// Lifetime of presigned URLs when none is configured
#[allow(clippy::duration_suboptimal_units)]
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

// SigV4 presigned URLs cannot outlive one week
#[allow(clippy::duration_suboptimal_units)]
const MAX_SIGNED_URL_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Name of an S3 bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bucket(String);

impl Bucket {
    /// Creates a bucket identifier
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The bucket name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Bucket {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Bucket {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Bucket {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Bucket {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Construction-time settings shared by every bucket client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOptions {
    /// AWS region of every registered bucket
    pub region: String,
    /// Lifetime of presigned GET URLs
    pub signed_url_ttl: Duration,
    /// Endpoint override, e.g. `LocalStack`
    pub endpoint_url: Option<String>,
    /// Path-style addressing (`endpoint/bucket/key`) instead of virtual-hosted style
    pub force_path_style: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            signed_url_ttl: DEFAULT_SIGNED_URL_TTL,
            endpoint_url: None,
            force_path_style: false,
        }
    }
}

impl RegistryOptions {
    fn validate(&self) -> BucketResult<()> {
        if self.region.trim().is_empty() {
            return Err(BucketError::ConfigError("Region must not be empty".to_string()));
        }
        validate_signed_url_ttl(self.signed_url_ttl)
    }
}

/// Rejects presigned URL lifetimes outside `1s..=7 days`
pub(crate) fn validate_signed_url_ttl(ttl: Duration) -> BucketResult<()> {
    if ttl < Duration::from_secs(1) || ttl > MAX_SIGNED_URL_TTL {
        return Err(BucketError::ConfigError(format!(
            "Signed URL TTL must be between 1 second and {} seconds, got {:?}",
            MAX_SIGNED_URL_TTL.as_secs(),
            ttl
        )));
    }
    Ok(())
}

/// Collects credentials, buckets and options for a [`BucketRegistry`]
pub struct BucketRegistryBuilder {
    access_key: String,
    secret_key: String,
    buckets: Vec<Bucket>,
    options: RegistryOptions,
    object_store: Option<Arc<dyn ObjectStore>>,
}

impl BucketRegistryBuilder {
    /// Registers a bucket
    #[must_use]
    pub fn bucket(mut self, bucket: impl Into<Bucket>) -> Self {
        self.buckets.push(bucket.into());
        self
    }

    /// Registers several buckets, in order
    #[must_use]
    pub fn buckets<I, B>(mut self, buckets: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bucket>,
    {
        self.buckets.extend(buckets.into_iter().map(Into::into));
        self
    }

    /// Replaces the default options
    #[must_use]
    pub fn options(mut self, options: RegistryOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses `object_store` instead of an S3 client built from the credentials
    #[must_use]
    pub fn object_store(mut self, object_store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(object_store);
        self
    }

    /// Creates one client handle per registered bucket
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if a credential, the region or a bucket name is empty,
    /// if a bucket is registered twice, or if the signed URL TTL is zero or longer than a week
    pub async fn build(self) -> BucketResult<BucketRegistry> {
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(BucketError::ConfigError(
                "Access key and secret key must not be empty".to_string(),
            ));
        }
        self.options.validate()?;

        let mut clients = HashMap::with_capacity(self.buckets.len());
        let store = match self.object_store {
            Some(store) => store,
            None => Arc::new(
                S3ObjectStore::connect(&self.access_key, &self.secret_key, &self.options).await,
            ),
        };

        for bucket in self.buckets {
            if bucket.as_str().is_empty() {
                return Err(BucketError::ConfigError(
                    "Bucket name must not be empty".to_string(),
                ));
            }
            if clients.contains_key(&bucket) {
                return Err(BucketError::ConfigError(format!(
                    "Bucket registered more than once: {bucket}"
                )));
            }
            let client = BucketClient::new(
                Arc::clone(&store),
                bucket.clone(),
                self.options.signed_url_ttl,
            );
            clients.insert(bucket, client);
        }

        info!(
            buckets = clients.len(),
            region = %self.options.region,
            "S3 clients initialized"
        );

        Ok(BucketRegistry { clients })
    }
}

/// Immutable mapping from bucket name to client handle
#[derive(Debug)]
pub struct BucketRegistry {
    clients: HashMap<Bucket, BucketClient>,
}

impl BucketRegistry {
    /// Starts a registry sharing one static credential pair across all buckets
    #[must_use]
    pub fn builder(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> BucketRegistryBuilder {
        BucketRegistryBuilder {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            buckets: Vec::new(),
            options: RegistryOptions::default(),
            object_store: None,
        }
    }

    /// Resolves the client handle for `bucket`
    ///
    /// # Errors
    ///
    /// Returns `BucketError::UnknownBucket` if `bucket` was not registered
    pub fn client(&self, bucket: &str) -> BucketResult<&BucketClient> {
        self.clients.get(bucket).ok_or_else(|| {
            warn!(bucket, "Bucket is not registered");
            BucketError::UnknownBucket(bucket.to_string())
        })
    }

    /// Whether `bucket` was registered
    #[must_use]
    pub fn contains(&self, bucket: &str) -> bool {
        self.clients.contains_key(bucket)
    }

    /// Registered buckets, in no particular order
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.clients.keys()
    }
}
