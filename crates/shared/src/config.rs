//! Application configuration management.

use serde::Deserialize;
use thiserror::Error;

/// Base URL used for retrieval links when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Maximum number of characters accepted in a single upload.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;

/// Seconds a single store call may take before it is abandoned.
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage configuration.
    pub storage: StorageConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL that retrieval links are built from.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: default_base_url(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the base URL without trailing slashes, falling back to
    /// [`DEFAULT_BASE_URL`] when the configured value is blank.
    #[must_use]
    pub fn public_base_url(&self) -> &str {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_BASE_URL
        } else {
            trimmed
        }
    }

    /// Returns the `host:port` pair to bind the listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable output for local development.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket that holds every uploaded text.
    pub bucket: String,
    /// Maximum upload length in characters.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
    /// Deadline in seconds for each store call.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,
    /// Storage backend.
    pub provider: StorageProvider,
}

fn default_max_content_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

fn default_operation_timeout() -> u64 {
    DEFAULT_OPERATION_TIMEOUT_SECS
}

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: MinIO, AWS S3, Cloudflare R2.
    S3 {
        /// Endpoint, either `host[:port]` or a full URL.
        endpoint: String,
        /// Access key ID.
        access_key: String,
        /// Secret access key.
        secret_key: String,
        /// Signing region.
        #[serde(default = "default_region")]
        region: String,
        /// Connect over TLS when the endpoint carries no scheme.
        #[serde(default)]
        use_ssl: bool,
    },
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl StorageProvider {
    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
        }
    }

    /// Builds the endpoint URL for an S3 provider.
    ///
    /// An endpoint that already carries a scheme is used as is, otherwise
    /// `use_ssl` picks between `https://` and `http://`.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let Self::S3 {
            endpoint, use_ssl, ..
        } = self;
        let endpoint = endpoint.trim().trim_end_matches('/');

        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        let scheme = if *use_ssl { "https" } else { "http" };
        format!("{scheme}://{endpoint}")
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    /// The bucket name is blank.
    #[error("storage.bucket must not be empty")]
    EmptyBucket,

    /// The upload ceiling would reject every upload.
    #[error("storage.max_content_length must be greater than zero")]
    ZeroMaxContentLength,

    /// Every store call would time out immediately.
    #[error("storage.operation_timeout_secs must be greater than zero")]
    ZeroOperationTimeout,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `YOURTEXT__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("YOURTEXT").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket is blank, or the upload ceiling or
    /// store deadline is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::EmptyBucket);
        }
        if self.storage.max_content_length == 0 {
            return Err(ConfigError::ZeroMaxContentLength);
        }
        if self.storage.operation_timeout_secs == 0 {
            return Err(ConfigError::ZeroOperationTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn minio(endpoint: &str, use_ssl: bool) -> StorageProvider {
        StorageProvider::S3 {
            endpoint: endpoint.to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            region: default_region(),
            use_ssl,
        }
    }

    fn storage(bucket: &str) -> StorageConfig {
        StorageConfig {
            bucket: bucket.to_string(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            operation_timeout_secs: DEFAULT_OPERATION_TIMEOUT_SECS,
            provider: minio("localhost:9000", false),
        }
    }

    #[test]
    fn test_server_config_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 8080);
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.public_base_url(), DEFAULT_BASE_URL);
        assert_eq!(server.log_format, LogFormat::Pretty);
        assert_eq!(server.bind_address(), "0.0.0.0:8080");
    }

    #[rstest]
    #[case("https://txt.example.com", "https://txt.example.com")]
    #[case("https://txt.example.com/", "https://txt.example.com")]
    #[case("https://txt.example.com//", "https://txt.example.com")]
    #[case("", DEFAULT_BASE_URL)]
    #[case("   ", DEFAULT_BASE_URL)]
    fn test_public_base_url(#[case] configured: &str, #[case] expected: &str) {
        let server = ServerConfig {
            base_url: configured.to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(server.public_base_url(), expected);
    }

    #[rstest]
    #[case("minio:9000", false, "http://minio:9000")]
    #[case("minio:9000", true, "https://minio:9000")]
    #[case("https://s3.amazonaws.com/", false, "https://s3.amazonaws.com")]
    #[case("http://127.0.0.1:9000", true, "http://127.0.0.1:9000")]
    fn test_s3_endpoint_url(#[case] endpoint: &str, #[case] use_ssl: bool, #[case] expected: &str) {
        let provider = minio(endpoint, use_ssl);
        assert_eq!(provider.endpoint_url(), expected);
        assert_eq!(provider.name(), "s3");
    }

    #[test]
    fn test_validate_rejects_blank_bucket() {
        let app = AppConfig {
            server: ServerConfig::default(),
            storage: storage("  "),
        };
        assert!(matches!(app.validate(), Err(ConfigError::EmptyBucket)));
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let mut storage = storage("texts");
        storage.max_content_length = 0;
        let app = AppConfig {
            server: ServerConfig::default(),
            storage,
        };
        assert!(matches!(
            app.validate(),
            Err(ConfigError::ZeroMaxContentLength)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_operation_timeout() {
        let mut storage = storage("texts");
        storage.operation_timeout_secs = 0;
        let app = AppConfig {
            server: ServerConfig::default(),
            storage,
        };
        assert!(matches!(
            app.validate(),
            Err(ConfigError::ZeroOperationTimeout)
        ));
    }

    #[test]
    fn test_only_s3_provider_is_accepted() {
        temp_env::with_vars(
            [
                ("YOURTEXT__STORAGE__BUCKET", Some("texts")),
                ("YOURTEXT__STORAGE__PROVIDER__TYPE", Some("local_fs")),
                ("YOURTEXT__STORAGE__PROVIDER__ROOT", Some("./data")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("YOURTEXT__SERVER__PORT", Some("9090")),
                ("YOURTEXT__SERVER__BASE_URL", Some("https://txt.example.com/")),
                ("YOURTEXT__STORAGE__BUCKET", Some("texts")),
                ("YOURTEXT__STORAGE__OPERATION_TIMEOUT_SECS", Some("5")),
                ("YOURTEXT__STORAGE__PROVIDER__TYPE", Some("s3")),
                ("YOURTEXT__STORAGE__PROVIDER__ENDPOINT", Some("localhost:9000")),
                ("YOURTEXT__STORAGE__PROVIDER__ACCESS_KEY", Some("minioadmin")),
                ("YOURTEXT__STORAGE__PROVIDER__SECRET_KEY", Some("minioadmin")),
            ],
            || {
                let app = AppConfig::load().expect("config should load");
                assert_eq!(app.server.port, 9090);
                assert_eq!(app.server.public_base_url(), "https://txt.example.com");
                assert_eq!(app.storage.bucket, "texts");
                assert_eq!(app.storage.max_content_length, DEFAULT_MAX_CONTENT_LENGTH);
                assert_eq!(app.storage.operation_timeout_secs, 5);
                assert_eq!(app.storage.provider, minio("localhost:9000", false));
            },
        );
    }

    #[test]
    fn test_load_s3_provider_from_environment() {
        temp_env::with_vars(
            [
                ("YOURTEXT__STORAGE__BUCKET", Some("texts")),
                ("YOURTEXT__STORAGE__PROVIDER__TYPE", Some("s3")),
                ("YOURTEXT__STORAGE__PROVIDER__ENDPOINT", Some("minio:9000")),
                ("YOURTEXT__STORAGE__PROVIDER__ACCESS_KEY", Some("minioadmin")),
                ("YOURTEXT__STORAGE__PROVIDER__SECRET_KEY", Some("minioadmin")),
            ],
            || {
                let app = AppConfig::load().expect("config should load");
                assert_eq!(app.storage.provider.endpoint_url(), "http://minio:9000");
            },
        );
    }

    #[test]
    fn test_load_without_bucket_fails() {
        temp_env::with_vars(
            [
                ("YOURTEXT__STORAGE__BUCKET", None::<&str>),
                ("YOURTEXT__STORAGE__PROVIDER__TYPE", Some("s3")),
                ("YOURTEXT__STORAGE__PROVIDER__ENDPOINT", Some("localhost:9000")),
                ("YOURTEXT__STORAGE__PROVIDER__ACCESS_KEY", Some("minioadmin")),
                ("YOURTEXT__STORAGE__PROVIDER__SECRET_KEY", Some("minioadmin")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
