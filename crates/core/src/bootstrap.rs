//! First-run bucket provisioning.

use thiserror::Error;
use tracing::{debug, info};

use crate::storage::{ObjectStore, StorageError};

/// Provisioning failures. Both are fatal: serving without a bucket would
/// fail every request.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The store could not tell whether the bucket exists.
    #[error("failed to check whether bucket '{bucket}' exists: {source}")]
    ExistenceCheck {
        /// Bucket name.
        bucket: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },

    /// The bucket was missing and could not be created.
    #[error("failed to create bucket '{bucket}': {source}")]
    Creation {
        /// Bucket name.
        bucket: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

/// Makes sure `bucket` exists, creating it when absent.
///
/// Single attempt, no retries; restarting the process is left to its
/// supervisor.
///
/// # Errors
///
/// Returns an error if the existence check or the creation fails.
pub async fn ensure_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<(), BootstrapError> {
    let exists = store
        .bucket_exists(bucket)
        .await
        .map_err(|source| BootstrapError::ExistenceCheck {
            bucket: bucket.to_string(),
            source,
        })?;

    if exists {
        debug!(bucket = %bucket, "Bucket already exists");
        return Ok(());
    }

    info!(bucket = %bucket, "Creating bucket");
    store
        .make_bucket(bucket)
        .await
        .map_err(|source| BootstrapError::Creation {
            bucket: bucket.to_string(),
            source,
        })
}
