use crate::error::HttpAppError;
use crate::services::upload::{spool_multipart, RegistrationUploadService, UploadAck, UploadLimits};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;

/// `POST /register/{contact_id}/upload`
///
/// Accepts the registration documents of one contact as a multipart body and stores them
/// once every file has passed validation and reputation screening.
pub async fn upload_registration_documents(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<UploadAck>, HttpAppError> {
    let files = spool_multipart(multipart, UploadLimits::from(&state.config)).await?;

    tracing::debug!(
        contact_id = %contact_id,
        file_count = files.len(),
        "Registration upload received"
    );

    let ack = RegistrationUploadService::from_state(&state)
        .handle(&contact_id, files)
        .await?;

    Ok(Json(ack))
}
