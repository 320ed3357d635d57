//! S3-compatible object store backend.
//!
//! Keys objects directly by their hex etag in a single bucket. Transport,
//! credentials, and retry policy are delegated to the AWS SDK; this backend
//! only maps the [`ObjectStore`] contract onto S3 calls.

use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ChecksumAlgorithm;
use aws_sdk_s3::Client;
use bytes::Bytes;
use cairn_types::Etag;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Object store backed by an S3-compatible bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Create a store over an existing S3 client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from ambient AWS configuration (environment, profile,
    /// instance metadata), with optional region and endpoint overrides.
    ///
    /// A custom endpoint enables path-style addressing, which S3-compatible
    /// services like MinIO require.
    pub async fn from_env(
        bucket: impl Into<String>,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let force_path_style = endpoint.is_some();
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if force_path_style {
            builder = builder.force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()), bucket)
    }

    /// The bucket this store writes into.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn exists(&self, etag: &Etag) -> StoreResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(etag.to_hex())
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                if let SdkError::ServiceError(ctx) = &err {
                    if ctx.err().is_not_found() {
                        return Ok(false);
                    }
                }
                Err(StoreError::Backend(format!("head {etag}: {err}")))
            }
        }
    }

    async fn get(&self, etag: &Etag) -> StoreResult<Option<Bytes>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(etag.to_hex())
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                if let SdkError::ServiceError(ctx) = &err {
                    if ctx.err().is_no_such_key() {
                        return Ok(None);
                    }
                }
                return Err(StoreError::Backend(format!("get {etag}: {err}")));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(format!("get {etag}: body: {e}")))?
            .into_bytes();

        // Verify-on-read, same contract as the local backends.
        let computed = Etag::from_content(&data);
        if computed != *etag {
            return Err(StoreError::HashMismatch {
                expected: *etag,
                computed,
            });
        }
        Ok(Some(data))
    }

    async fn put(&self, etag: &Etag, data: Bytes) -> StoreResult<()> {
        let computed = Etag::from_content(&data);
        if computed != *etag {
            return Err(StoreError::HashMismatch {
                expected: *etag,
                computed,
            });
        }

        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(etag.to_hex())
            .content_length(size as i64)
            // The SDK computes and sends the checksum so the service can
            // verify integrity on ingest.
            .checksum_algorithm(ChecksumAlgorithm::Sha256)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| StoreError::Backend(format!("put {etag}: {err}")))?;

        debug!(%etag, size, bucket = %self.bucket, "stored object to s3");
        Ok(())
    }
}
