//! Storage error types.

use std::time::Duration;

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not found in storage.
    #[error("object not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Bucket does not exist.
    #[error("bucket not found: {bucket}")]
    BucketNotFound {
        /// Bucket name.
        bucket: String,
    },

    /// Declared content length disagrees with the payload.
    #[error("size mismatch for {key}: declared {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Storage key being written.
        key: String,
        /// Declared size.
        expected: u64,
        /// Payload size.
        actual: u64,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Backend operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// The store did not answer within the deadline.
    #[error("{operation} {key} timed out after {}ms", .after.as_millis())]
    Timeout {
        /// Store operation that was abandoned.
        operation: &'static str,
        /// Storage key involved.
        key: String,
        /// Deadline that elapsed.
        after: Duration,
    },
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a bucket not found error.
    #[must_use]
    pub fn bucket_not_found(bucket: impl Into<String>) -> Self {
        Self::BucketNotFound {
            bucket: bucket.into(),
        }
    }

    /// Create a size mismatch error.
    #[must_use]
    pub fn size_mismatch(key: impl Into<String>, expected: u64, actual: u64) -> Self {
        Self::SizeMismatch {
            key: key.into(),
            expected,
            actual,
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(operation: &'static str, key: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            operation,
            key: key.into(),
            after,
        }
    }

    /// Returns true if the object is missing rather than unreachable.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the store never answered.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_key() {
        let err = StorageError::not_found("2024/03/05/a.txt");
        assert!(err.is_not_found());
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "object not found: 2024/03/05/a.txt");
    }

    #[test]
    fn test_timeout_display() {
        let err = StorageError::timeout("put", "2024/03/05/a.txt", Duration::from_millis(250));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "put 2024/03/05/a.txt timed out after 250ms");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StorageError::bucket_not_found("texts").to_string(),
            "bucket not found: texts"
        );
        assert_eq!(
            StorageError::size_mismatch("k", 3, 4).to_string(),
            "size mismatch for k: declared 3 bytes, got 4"
        );
    }
}
