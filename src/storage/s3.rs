//! S3-compatible store client (MinIO, AWS)

use anyhow::{Context, Result};
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::config::StorageConfig;
use crate::storage::{Existence, ObjectStore};

/// Blob store backed by an S3-compatible endpoint with static credentials.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client for the configured endpoint.
    ///
    /// Path-style addressing is required for MinIO, which does not resolve
    /// virtual-host bucket names.
    pub fn connect(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "static",
        );

        let sdk_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
        }
    }
}

impl ObjectStore for S3Store {
    async fn probe(&self) -> Result<()> {
        self.client
            .list_buckets()
            .send()
            .await
            .context("object storage endpoint is unreachable")?;
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<Existence> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(Existence::Present),
            Err(err) => match err.as_service_error() {
                Some(service_err) if service_err.is_not_found() => {
                    debug!(bucket = %bucket, "Bucket not found");
                    Ok(Existence::Absent)
                }
                _ => Err(err).with_context(|| format!("failed to probe bucket '{bucket}'")),
            },
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .with_context(|| format!("failed to create bucket '{bucket}'"))?;
        Ok(())
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<Existence> {
        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(Existence::Present),
            Err(err) => match err.as_service_error() {
                Some(service_err) if service_err.is_not_found() => {
                    debug!(bucket = %bucket, key = %key, "Object not found");
                    Ok(Existence::Absent)
                }
                _ => {
                    Err(err).with_context(|| format!("failed to probe object '{bucket}/{key}'"))
                }
            },
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| format!("failed to upload object '{bucket}/{key}'"))?;
        Ok(())
    }
}
