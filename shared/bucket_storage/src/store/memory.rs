//! In-memory object store for tests

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;

use super::ObjectStore;
use crate::{registry::validate_signed_url_ttl, BucketResult, PresignedUrl};

type ObjectMap = HashMap<(String, String), Vec<u8>>;

/// Object store keeping every object in a process-local map
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<ObjectMap>,
}

impl InMemoryObjectStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes stored under `key` in `bucket`
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Returns the sorted keys stored in `bucket`
    #[must_use]
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn objects(&self) -> MutexGuard<'_, ObjectMap> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn store(&self, bucket: &str, key: &str, body: ByteStream) -> BucketResult<()> {
        let data = body.collect().await?.into_bytes().to_vec();
        self.objects().insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn sign(&self, bucket: &str, key: &str, ttl: Duration) -> BucketResult<PresignedUrl> {
        validate_signed_url_ttl(ttl)?;
        Ok(PresignedUrl {
            url: format!("memory://{bucket}/{key}?expires-in={}", ttl.as_secs()),
            expires_at: Utc::now() + ttl,
        })
    }
}
