//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (GCS, S3, local filesystem) implement this trait so the upload
/// pipeline never couples to a specific provider.
///
/// Writes never check for an existing object first: a second write to the same key
/// replaces the object with whatever semantics the backend applies by default.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an object from a stream to an exact storage key.
    ///
    /// The reader is consumed until EOF without buffering the whole object in memory.
    ///
    /// # Arguments
    /// * `storage_key` - Destination key (see the crate root for the layout)
    /// * `content_type` - MIME type of the content
    /// * `content_length` - Expected size, if known (used for logging)
    /// * `reader` - Async reader that provides the object content
    ///
    /// # Returns
    /// Number of bytes written
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Download an object by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
