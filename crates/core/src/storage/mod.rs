//! Object storage capability used by the relay.
//!
//! The relay only needs five operations from a store, so that is all the
//! [`ObjectStore`] trait exposes. Two implementations:
//! - [`S3ObjectStore`]: S3-compatible services (MinIO, AWS S3, R2) via the AWS SDK
//! - [`MemoryObjectStore`]: in-process map with failure injection, for tests only
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        ObjectStore                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ put(bucket, key, data, size, ct)  │ bucket_exists(bucket)        │
//! │ get(bucket, key) -> stream        │ make_bucket(bucket)          │
//! │ stat(bucket, key) -> ObjectInfo   │                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod error;
mod memory;
mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use yourtext_shared::StorageProvider;

pub use error::StorageError;
pub use memory::{MemoryFailure, MemoryObjectStore};
pub use s3::S3ObjectStore;

/// Streamed object body.
pub type ObjectBody = BoxStream<'static, Result<Bytes, StorageError>>;

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Storage key.
    pub key: String,
    /// Content length in bytes.
    pub size: u64,
    /// Content type recorded by the store, if any.
    pub content_type: Option<String>,
}

/// Capability set the relay needs from an object store.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `data` under `key`. `size` must equal `data.len()`.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size: u64,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Opens an object for streaming.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the object does not exist.
    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError>;

    /// Fetches object metadata without the body.
    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectInfo, StorageError>;

    /// Reports whether the bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError>;

    /// Creates the bucket.
    async fn make_bucket(&self, bucket: &str) -> Result<(), StorageError>;
}

/// Rejects a write whose declared size disagrees with its payload.
pub(crate) fn check_size(key: &str, data: &Bytes, size: u64) -> Result<(), StorageError> {
    let actual = data.len() as u64;
    if actual == size {
        Ok(())
    } else {
        Err(StorageError::size_mismatch(key, size, actual))
    }
}

/// Creates the store selected by the provider configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be initialized.
pub fn build_store(provider: &StorageProvider) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let store: Arc<dyn ObjectStore> = match provider {
        StorageProvider::S3 { .. } => Arc::new(S3ObjectStore::from_provider(provider)?),
    };
    Ok(store)
}
