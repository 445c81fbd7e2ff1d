//! Relay error types.

use thiserror::Error;
use yourtext_shared::ResponseCode;

use crate::address::StorageKey;
use crate::storage::StorageError;

/// Relay operation errors.
///
/// `Display` yields the client-facing message; the storage cause, when
/// there is one, is reachable through `source()` for logging.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or empty content, or an empty download path.
    #[error("Bad request")]
    BadRequest,

    /// Content exceeds the configured ceiling.
    #[error("content too long, max length is {max}")]
    ContentTooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },

    /// The store rejected the write, or never answered.
    #[error("failed to upload")]
    UploadFailed {
        /// Key the text was being written under.
        key: StorageKey,
        /// Store failure.
        #[source]
        source: StorageError,
    },

    /// The object is missing or could not be opened.
    #[error("failed to get object")]
    ObjectNotFound(#[source] StorageError),

    /// The object was opened but its metadata could not be fetched.
    #[error("failed to get object stat")]
    StatFailed(#[source] StorageError),
}

impl RelayError {
    /// Returns the application response code for this error.
    #[must_use]
    pub const fn code(&self) -> ResponseCode {
        match self {
            Self::BadRequest => ResponseCode::BadRequest,
            Self::ContentTooLong { .. } => ResponseCode::ContentTooLong,
            Self::UploadFailed { .. } => ResponseCode::UploadFailed,
            Self::ObjectNotFound(_) => ResponseCode::ObjectNotFound,
            Self::StatFailed(_) => ResponseCode::StatFailed,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code().status_code()
    }

    /// Returns the storage error behind this failure, if any.
    #[must_use]
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::UploadFailed { source, .. } => Some(source),
            Self::ObjectNotFound(e) | Self::StatFailed(e) => Some(e),
            Self::BadRequest | Self::ContentTooLong { .. } => None,
        }
    }
}
