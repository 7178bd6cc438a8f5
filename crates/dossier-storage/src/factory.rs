#[cfg(feature = "storage-cloud")]
use crate::CloudStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use dossier_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-cloud")]
        StorageBackend::Gcs => {
            let bucket = config
                .gcs_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("GCS_BUCKET not configured".to_string()))?;
            let service_account_key = config
                .gcp_service_account
                .as_ref()
                .map(|account| account.to_json())
                .transpose()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;

            let storage = CloudStorage::gcs(bucket, service_account_key)?;
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-cloud")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = CloudStorage::s3(bucket, region, config.s3_endpoint.clone())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-cloud"))]
        StorageBackend::Gcs | StorageBackend::S3 => Err(StorageError::ConfigError(
            "Cloud storage backends not available (storage-cloud feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
