//! Multipart spooling: each file part is streamed to its own temporary file.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use dossier_core::constants::FALLBACK_CONTENT_TYPE;
use dossier_core::AppError;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use super::types::{UploadLimits, UploadedFile};

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Read every part of the request into temporary files, in received order.
///
/// Fails with `PayloadTooLarge` when a part exceeds the per-file limit or the request has
/// more file parts than allowed, and with `InvalidInput` for plain (non-file) fields or
/// malformed bodies. Files spooled before a failure are removed when the partial list drops.
pub async fn spool_multipart(
    mut multipart: Multipart,
    limits: UploadLimits,
) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        let Some(original_file_name) = field.file_name().map(str::to_string) else {
            return Err(AppError::InvalidInput(format!(
                "Field '{}' is not a file; only file fields are accepted",
                field_name
            )));
        };

        if files.len() >= limits.max_files {
            return Err(AppError::PayloadTooLarge(format!(
                "Too many files; at most {} are allowed",
                limits.max_files
            )));
        }

        let mime_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        let (std_file, temp_path) = NamedTempFile::new()?.into_parts();
        let mut file = tokio::fs::File::from_std(std_file);
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len() as u64;
            if size > limits.max_file_size_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "File '{}' exceeds maximum allowed size of {} MB",
                    field_name,
                    limits.max_file_size_bytes / 1024 / 1024
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(
            field = %field_name,
            file_name = %original_file_name,
            content_type = %mime_type,
            size_bytes = size,
            "Multipart file spooled"
        );

        files.push(UploadedFile::new(
            field_name,
            mime_type,
            original_file_name,
            size,
            temp_path,
        ));
    }

    Ok(files)
}
