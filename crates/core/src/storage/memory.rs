//! In-process store with failure injection, used as the test double for
//! the object store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use super::{ObjectBody, ObjectInfo, ObjectStore, StorageError, check_size};

/// Operation that a [`MemoryObjectStore`] can be told to fail or stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryFailure {
    /// `put` returns an operation error.
    Put,
    /// `get` returns an operation error.
    Get,
    /// `stat` returns an operation error.
    Stat,
    /// `bucket_exists` returns an operation error.
    BucketExists,
    /// `make_bucket` returns an operation error.
    MakeBucket,
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// `HashMap`-backed store. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: Mutex<HashMap<String, HashMap<String, StoredObject>>>,
    failures: Mutex<HashSet<MemoryFailure>>,
    stalls: Mutex<HashSet<MemoryFailure>>,
    put_calls: AtomicUsize,
    make_bucket_calls: AtomicUsize,
}

impl MemoryObjectStore {
    /// Create an empty store with no buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds an empty `bucket`.
    #[must_use]
    pub fn with_bucket(bucket: &str) -> Self {
        let store = Self::new();
        store.buckets().insert(bucket.to_string(), HashMap::new());
        store
    }

    /// Make `op` fail until [`Self::clear_failures`] is called.
    pub fn fail(&self, op: MemoryFailure) {
        self.failures().insert(op);
    }

    /// Make `op` hang without ever completing, like an unresponsive backend.
    pub fn stall(&self, op: MemoryFailure) {
        self.stalls().insert(op);
    }

    /// Stop injecting failures and stalls.
    pub fn clear_failures(&self) {
        self.failures().clear();
        self.stalls().clear();
    }

    /// Number of `put` calls received, failed ones included.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of `make_bucket` calls received, failed ones included.
    pub fn make_bucket_calls(&self) -> usize {
        self.make_bucket_calls.load(Ordering::SeqCst)
    }

    /// Number of objects stored in `bucket`.
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets().get(bucket).map_or(0, HashMap::len)
    }

    fn buckets(&self) -> MutexGuard<'_, HashMap<String, HashMap<String, StoredObject>>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn failures(&self) -> MutexGuard<'_, HashSet<MemoryFailure>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stalls(&self) -> MutexGuard<'_, HashSet<MemoryFailure>> {
        self.stalls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn check_failure(&self, op: MemoryFailure) -> Result<(), StorageError> {
        let stalled = self.stalls().contains(&op);
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.failures().contains(&op) {
            Err(StorageError::operation(format!("injected {op:?} failure")))
        } else {
            Ok(())
        }
    }

    fn object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let buckets = self.buckets();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::bucket_not_found(bucket))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size: u64,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(MemoryFailure::Put).await?;
        check_size(key, &data, size)?;

        let mut buckets = self.buckets();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::bucket_not_found(bucket))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError> {
        self.check_failure(MemoryFailure::Get).await?;
        let object = self.object(bucket, key)?;
        Ok(futures::stream::once(async move { Ok(object.data) }).boxed())
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectInfo, StorageError> {
        self.check_failure(MemoryFailure::Stat).await?;
        let object = self.object(bucket, key)?;
        Ok(ObjectInfo {
            key: key.to_string(),
            size: object.data.len() as u64,
            content_type: Some(object.content_type),
        })
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        self.check_failure(MemoryFailure::BucketExists).await?;
        Ok(self.buckets().contains_key(bucket))
    }

    async fn make_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.make_bucket_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(MemoryFailure::MakeBucket).await?;
        self.buckets().entry(bucket.to_string()).or_default();
        Ok(())
    }
}
