//! Types used by the registration upload service

use dossier_core::Config;
use serde::Serialize;
use std::path::Path;
use tempfile::TempPath;

/// One file part of an upload request, spooled to a temporary file.
///
/// The temporary file is deleted when this value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    /// Multipart field name (empty when the part had none)
    pub field_name: String,
    /// Declared content type as sent by the client
    pub mime_type: String,
    /// Client-supplied file name, only used for its extension
    pub original_file_name: String,
    /// Bytes spooled to disk
    pub size: u64,
    /// Lowercase hex SHA-256, set once the pipeline has hashed the file
    pub content_hash: Option<String>,
    temp_path: TempPath,
}

impl UploadedFile {
    pub fn new(
        field_name: String,
        mime_type: String,
        original_file_name: String,
        size: u64,
        temp_path: TempPath,
    ) -> Self {
        Self {
            field_name,
            mime_type,
            original_file_name,
            size,
            content_hash: None,
            temp_path,
        }
    }

    /// Location of the spooled content
    pub fn path(&self) -> &Path {
        &self.temp_path
    }
}

/// Limits enforced while spooling a multipart body
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_size_bytes: u64,
    pub max_files: usize,
}

impl From<&Config> for UploadLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes as u64,
            max_files: config.max_files,
        }
    }
}

/// Successful upload acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct UploadAck {
    pub ok: bool,
    /// ISO-8601 UTC with millisecond precision
    pub timestamp: String,
}

impl UploadAck {
    pub fn now() -> Self {
        Self {
            ok: true,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}
