//! Relay service implementation.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::error::RelayError;
use super::types::{Download, RelayConfig, TEXT_CONTENT_TYPE, UploadReceipt};
use crate::address::StorageKey;
use crate::storage::{ObjectStore, StorageError};

/// Upload and download flows over an [`ObjectStore`].
///
/// Stateless apart from the immutable config, so one instance serves all
/// requests concurrently. Every store call runs under
/// [`RelayConfig::operation_timeout`]; a call that outlives it is dropped
/// and reported like any other store failure.
pub struct TextRelay {
    store: Arc<dyn ObjectStore>,
    config: RelayConfig,
}

impl TextRelay {
    /// Create a new relay.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: RelayConfig) -> Self {
        Self { store, config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Checks upload content against the relay's constraints.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for empty content and `ContentTooLong` above
    /// the configured ceiling.
    pub fn validate(&self, content: &str) -> Result<(), RelayError> {
        if content.is_empty() {
            return Err(RelayError::BadRequest);
        }

        let max = self.config.max_content_length;
        // Byte length bounds character count from above
        if content.len() > max && content.chars().count() > max {
            return Err(RelayError::ContentTooLong { max });
        }

        Ok(())
    }

    /// Stores `content` under a fresh key and returns its retrieval URL.
    ///
    /// # Errors
    ///
    /// Returns a validation error without touching the store, or
    /// `UploadFailed` if the write is rejected or times out.
    pub async fn upload(&self, content: String) -> Result<UploadReceipt, RelayError> {
        self.upload_at(content, Utc::now()).await
    }

    /// Like [`Self::upload`], addressing the object as if received at `now`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::upload`].
    pub async fn upload_at(
        &self,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<UploadReceipt, RelayError> {
        self.validate(&content)?;

        let key = StorageKey::generate(now);
        let data = Bytes::from(content);
        let size = data.len() as u64;
        debug!(key = %key, size, "Uploading text");

        let put = self.store.put(
            &self.config.bucket,
            key.as_str(),
            data,
            size,
            TEXT_CONTENT_TYPE,
        );
        let stored = self.within_deadline("put", &key, put).await;
        if let Err(source) = stored {
            return Err(RelayError::UploadFailed { key, source });
        }

        let url = self.config.url_for(&key);
        Ok(UploadReceipt { key, url })
    }

    /// Resolves a request path to a stored object.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an empty path, `ObjectNotFound` if the object
    /// cannot be opened and `StatFailed` if its metadata cannot be read.
    pub async fn download(&self, path: &str) -> Result<Download, RelayError> {
        let key = StorageKey::from_request_path(path).ok_or(RelayError::BadRequest)?;

        let get = self.store.get(&self.config.bucket, key.as_str());
        let body = self
            .within_deadline("get", &key, get)
            .await
            .map_err(RelayError::ObjectNotFound)?;

        let stat = self.store.stat(&self.config.bucket, key.as_str());
        let info = self
            .within_deadline("stat", &key, stat)
            .await
            .map_err(RelayError::StatFailed)?;

        Ok(Download { key, info, body })
    }

    async fn within_deadline<T>(
        &self,
        operation: &'static str,
        key: &StorageKey,
        call: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        let deadline = self.config.operation_timeout;
        if let Ok(result) = tokio::time::timeout(deadline, call).await {
            result
        } else {
            warn!(operation, key = %key, ?deadline, "Store call timed out");
            Err(StorageError::timeout(operation, key.as_str(), deadline))
        }
    }
}
