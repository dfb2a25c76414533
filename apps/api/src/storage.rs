//! Thin proxy over the external object store.
//!
//! Three stateless operations delegating to S3. Keys pass through untouched:
//! ownership and well-formedness are the caller's responsibility (see
//! `naming::ensure_owned`), which keeps this proxy reusable for any
//! storage-backed feature.

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, error};

use crate::errors::AppError;

/// Default lifetime of a presigned download URL.
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(3600);

/// S3-backed object store client, shared across handlers.
#[derive(Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Stores `bytes` at `key`, overwriting any existing object.
    pub async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        debug!(key, size = bytes.len(), "uploading object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("S3 upload failed for {key}: {e}");
                AppError::Store("Failed to upload to S3".to_string())
            })?;
        Ok(())
    }

    /// Produces a time-boxed, credential-free download URL for `key`.
    pub async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid presign TTL: {e}")))?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                error!("S3 presign failed for {key}: {e}");
                AppError::Store("Failed to generate download URL".to_string())
            })?;
        Ok(presigned.uri().to_string())
    }

    /// Removes the object at `key`. S3 DeleteObject treats an absent object
    /// as success, so repeated deletes are idempotent.
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        debug!(key, "deleting object");
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!("S3 delete failed for {key}: {e}");
                AppError::Store("Failed to delete from S3".to_string())
            })?;
        Ok(())
    }
}
