//! S3-compatible store using the AWS SDK.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig, timeout::TimeoutConfig},
    error::{DisplayErrorContext, SdkError},
    operation::{get_object::GetObjectError, head_bucket::HeadBucketError, head_object::HeadObjectError},
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
};
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};
use yourtext_shared::StorageProvider;

use super::{ObjectBody, ObjectInfo, ObjectStore, StorageError, check_size};

const MAX_ATTEMPTS: u32 = 3;
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REGION: &str = "us-east-1";

/// Store backed by an S3-compatible service.
///
/// Uses path-style addressing so MinIO and other self-hosted services work
/// without wildcard DNS.
pub struct S3ObjectStore {
    client: Client,
    region: String,
}

impl S3ObjectStore {
    /// Creates a store from an existing SDK client.
    #[must_use]
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Creates a store from provider configuration with static credentials.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` if the endpoint is blank.
    pub fn from_provider(provider: &StorageProvider) -> Result<Self, StorageError> {
        let StorageProvider::S3 {
            endpoint,
            access_key,
            secret_key,
            region,
            ..
        } = provider;
        if endpoint.trim().is_empty() {
            return Err(StorageError::configuration("s3 endpoint missing"));
        }
        let endpoint_url = provider.endpoint_url();

        let retry_config = RetryConfig::standard()
            .with_max_attempts(MAX_ATTEMPTS)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(OPERATION_TIMEOUT)
            .build();

        let credentials = Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None,
            None,
            "yourtext-static",
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&endpoint_url)
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .build();

        info!(
            endpoint = %endpoint_url,
            region = %region,
            max_attempts = MAX_ATTEMPTS,
            "Initialized S3 object store"
        );

        Ok(Self::new(Client::from_conf(config), region.clone()))
    }
}

fn operation_error<E, R>(op: &str, key: &str, err: &SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let msg = format!("{op} {key}: {}", DisplayErrorContext(err));
    error!(error = %msg, "S3 request failed");
    StorageError::operation(msg)
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        size: u64,
        content_type: &str,
    ) -> Result<(), StorageError> {
        check_size(key, &data, size)?;
        let content_length = i64::try_from(size)
            .map_err(|_| StorageError::size_mismatch(key, size, data.len() as u64))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(content_length)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| operation_error("put", key, &e))?;

        debug!(bucket = %bucket, key = %key, size, "Stored object");
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(ref service_err) = e {
                    if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) {
                        return StorageError::not_found(key);
                    }
                }
                operation_error("get", key, &e)
            })?;

        let stream = ReaderStream::new(output.body.into_async_read())
            .map_err(|e| StorageError::operation(e.to_string()));
        Ok(stream.boxed())
    }

    async fn stat(&self, bucket: &str, key: &str) -> Result<ObjectInfo, StorageError> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(ref service_err) = e {
                    if matches!(service_err.err(), HeadObjectError::NotFound(_)) {
                        return StorageError::not_found(key);
                    }
                }
                operation_error("stat", key, &e)
            })?;

        let size = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok())
            .unwrap_or_default();

        Ok(ObjectInfo {
            key: key.to_string(),
            size,
            content_type: output.content_type().map(String::from),
        })
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(ref service_err))
                if matches!(service_err.err(), HeadBucketError::NotFound(_)) =>
            {
                Ok(false)
            }
            Err(e) => Err(operation_error("head bucket", bucket, &e)),
        }
    }

    async fn make_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 is the implicit location and rejects an explicit constraint
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| operation_error("create bucket", bucket, &e))?;
        Ok(())
    }
}
