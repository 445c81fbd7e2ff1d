//! Relay configuration and result types.

use std::time::Duration;

use yourtext_shared::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_OPERATION_TIMEOUT_SECS,
};

use crate::address::StorageKey;
use crate::storage::{ObjectBody, ObjectInfo};

/// Content type of every object the relay writes.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Immutable relay settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Bucket holding all uploads.
    pub bucket: String,
    /// Base URL retrieval links are joined onto.
    pub base_url: String,
    /// Maximum upload length in characters.
    pub max_content_length: usize,
    /// Deadline for each store call.
    pub operation_timeout: Duration,
}

impl RelayConfig {
    /// Create a relay config for `bucket` with default settings.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }

    /// Set the public base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the maximum upload length in characters.
    #[must_use]
    pub fn with_max_content_length(mut self, max: usize) -> Self {
        self.max_content_length = max;
        self
    }

    /// Set the deadline for each store call.
    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Joins the base URL and `key` with exactly one `/`.
    ///
    /// A blank base URL falls back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn url_for(&self, key: &StorageKey) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let base = if base.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base
        };
        format!("{base}/{}", key.as_str().trim_start_matches('/'))
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Key the text was stored under.
    pub key: StorageKey,
    /// Public retrieval URL.
    pub url: String,
}

/// An object ready to be streamed to the caller.
pub struct Download {
    /// Key that was requested.
    pub key: StorageKey,
    /// Metadata reported by the store.
    pub info: ObjectInfo,
    /// Object body.
    pub body: ObjectBody,
}

impl Download {
    /// Content type to send, falling back to plain text for stores that do
    /// not record one.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.info
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(TEXT_CONTENT_TYPE)
    }

    /// Attachment file name: the final segment of the key.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.key.file_name()
    }

    /// `Content-Disposition` value marking the body as a download.
    #[must_use]
    pub fn content_disposition(&self) -> String {
        let escaped = self.file_name().replace('\\', "\\\\").replace('"', "\\\"");
        format!("attachment; filename=\"{escaped}\"")
    }
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("key", &self.key)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use rstest::rstest;

    fn download(key: &str, content_type: Option<&str>) -> Download {
        let key = StorageKey::from_request_path(key).expect("non-empty key");
        Download {
            info: ObjectInfo {
                key: key.to_string(),
                size: 0,
                content_type: content_type.map(String::from),
            },
            key,
            body: futures::stream::empty().boxed(),
        }
    }

    #[test]
    fn test_relay_config_defaults() {
        let config = RelayConfig::new("texts");
        assert_eq!(config.bucket, "texts");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_content_length, 10_000);
        assert_eq!(config.operation_timeout, Duration::from_secs(30));
    }

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/2024/03/05/a.txt")]
    #[case("https://txt.example.com/", "https://txt.example.com/2024/03/05/a.txt")]
    #[case("https://txt.example.com///", "https://txt.example.com/2024/03/05/a.txt")]
    #[case("", "http://localhost:8080/2024/03/05/a.txt")]
    fn test_url_for(#[case] base: &str, #[case] expected: &str) {
        let config = RelayConfig::new("texts").with_base_url(base);
        let key = StorageKey::from_request_path("2024/03/05/a.txt").expect("key");
        assert_eq!(config.url_for(&key), expected);
    }

    #[test]
    fn test_content_type_fallback() {
        assert_eq!(download("a.txt", None).content_type(), TEXT_CONTENT_TYPE);
        assert_eq!(download("a.txt", Some("")).content_type(), TEXT_CONTENT_TYPE);
        assert_eq!(
            download("a.txt", Some("text/plain; charset=utf-8")).content_type(),
            "text/plain; charset=utf-8"
        );
    }

    #[rstest]
    #[case("2024/03/05/abc.txt", "attachment; filename=\"abc.txt\"")]
    #[case("notes.txt", "attachment; filename=\"notes.txt\"")]
    #[case("a\"b.txt", "attachment; filename=\"a\\\"b.txt\"")]
    fn test_content_disposition(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(download(key, None).content_disposition(), expected);
    }
}
