//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Collaborator errors (`StorageError`,
//! `ReputationError`) convert into `AppError` first so every failure renders through the
//! same status/body/logging path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dossier_core::{AppError, ErrorMetadata, LogLevel};
use dossier_services::ReputationError;
use dossier_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

fn error_response(app_error: &AppError, is_production: bool) -> ErrorResponse {
    // Details are only exposed outside production, and never for sensitive errors
    let expose_details = !is_production && !app_error.is_sensitive();

    ErrorResponse {
        error: app_error.client_message(),
        details: expose_details.then(|| app_error.detailed_message()),
        error_type: expose_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_response(app_error, is_production_env()))).into_response()
    }
}

// Collaborator errors become AppError at the pipeline boundary

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error_to_app(err))
    }
}

pub(crate) fn storage_error_to_app(err: StorageError) -> AppError {
    match err {
        StorageError::UploadFailed(msg) | StorageError::DownloadFailed(msg) => {
            AppError::Storage(msg)
        }
        StorageError::NotFound(key) => AppError::Storage(format!("Object not found: {}", key)),
        StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
        StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

impl From<ReputationError> for HttpAppError {
    fn from(err: ReputationError) -> Self {
        HttpAppError(reputation_error_to_app(err))
    }
}

pub(crate) fn reputation_error_to_app(err: ReputationError) -> AppError {
    AppError::Reputation(err.to_string())
}
