//! Storage key generation and parsing.
//!
//! Keys look like `2024/03/05/<uuid>.txt`: the upload date keeps a bucket
//! browsable by day, the UUID v4 keeps keys unique without coordination.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// File extension appended to every generated key.
pub const KEY_SUFFIX: &str = ".txt";

/// Path-like identifier of one stored object within a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generates a fresh key for an upload received at `now`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self::from_parts(now, Uuid::new_v4())
    }

    /// Builds the key for a known date and identifier.
    #[must_use]
    pub fn from_parts(date: DateTime<Utc>, id: Uuid) -> Self {
        Self(format!("{}/{id}{KEY_SUFFIX}", date.format("%Y/%m/%d")))
    }

    /// Interprets a request path as a key by stripping leading slashes.
    ///
    /// Returns `None` when nothing is left.
    #[must_use]
    pub fn from_request_path(path: &str) -> Option<Self> {
        let key = path.trim_start_matches('/');
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the final path segment, used as the download file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates a storage key for an upload received at `now`.
#[must_use]
pub fn generate_key(now: DateTime<Utc>) -> StorageKey {
    StorageKey::generate(now)
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
