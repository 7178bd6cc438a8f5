use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, Result as ObjectResult};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Object storage implementation backed by `object_store` (Google Cloud Storage or S3)
#[derive(Clone)]
pub struct CloudStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
}

impl CloudStorage {
    /// Create a Google Cloud Storage backend
    ///
    /// # Arguments
    /// * `bucket` - GCS bucket name
    /// * `service_account_key` - Optional service account key JSON. When absent, credentials
    ///   are discovered from the environment (`GOOGLE_SERVICE_ACCOUNT`, ...)
    pub fn gcs(bucket: String, service_account_key: Option<String>) -> StorageResult<Self> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket.clone());

        if let Some(key) = service_account_key {
            builder = builder.with_service_account_key(key);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::from_store(Arc::new(store), bucket, StorageBackend::Gcs))
    }

    /// Create an S3 backend
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn s3(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::from_store(Arc::new(store), bucket, StorageBackend::S3))
    }

    /// Wrap an already-built object store
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        backend: StorageBackend,
    ) -> Self {
        Self {
            store,
            bucket,
            backend,
        }
    }

    /// Keys are stored verbatim. `Path::from` would percent-encode characters such as `#`
    /// in the contact id, so the object would land under a different key.
    fn location(storage_key: &str) -> StorageResult<Path> {
        Path::parse(storage_key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }
}

#[async_trait]
impl Storage for CloudStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let start = std::time::Instant::now();
        let location = Self::location(storage_key)?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // BufWriter switches to a multipart upload once the buffer capacity is exceeded
        let mut writer = BufWriter::new(self.store.clone(), location).with_attributes(attributes);

        let written = match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::debug!(
                        error = %abort_err,
                        key = %storage_key,
                        "Failed to abort partial upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object storage stream upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        writer.shutdown().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = written,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object storage upload completion failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            backend = %self.backend,
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            expected_bytes = ?content_length,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage stream upload successful"
        );

        Ok(written)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let location = Self::location(storage_key)?;

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object storage download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len(),
            "Object storage download successful"
        );

        Ok(bytes.to_vec())
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
