//! Registration document upload pipeline
//!
//! validate fields → validate types → hash → screen reputation → store → acknowledge.
//! Every gate covers the whole batch before the next step starts, so nothing is stored
//! unless every file passed every check.

use std::sync::Arc;
use std::time::Instant;

use dossier_core::{AcceptedMimeType, AppError, DocumentSlot};
use dossier_services::{sha256_file, ReputationService, Verdict};
use dossier_storage::{destination_key, Storage};
use futures::future::join_all;

use super::types::{UploadAck, UploadedFile};
use crate::error::{reputation_error_to_app, storage_error_to_app};
use crate::state::AppState;

/// A file that passed field and type validation
struct AcceptedFile<'a> {
    file: &'a UploadedFile,
    slot: DocumentSlot,
    mime_type: AcceptedMimeType,
}

pub struct RegistrationUploadService {
    storage: Arc<dyn Storage>,
    reputation: Arc<dyn ReputationService>,
    malicious_threshold: u64,
}

impl RegistrationUploadService {
    pub fn new(
        storage: Arc<dyn Storage>,
        reputation: Arc<dyn ReputationService>,
        malicious_threshold: u64,
    ) -> Self {
        Self {
            storage,
            reputation,
            malicious_threshold,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.storage.clone(),
            state.reputation.clone(),
            state.config.malicious_detection_threshold,
        )
    }

    /// Run the whole pipeline for one request.
    ///
    /// `files` must be in received order; it determines the sequence numbers in the
    /// destination keys. Temporary files are removed when `files` drops, whatever the outcome.
    pub async fn handle(
        &self,
        contact_id: &str,
        mut files: Vec<UploadedFile>,
    ) -> Result<UploadAck, AppError> {
        let start = Instant::now();

        let slots = validate_fields(&files)?;
        let mime_types = validate_types(&files)?;

        self.hash_files(&mut files).await?;

        let accepted: Vec<AcceptedFile<'_>> = files
            .iter()
            .zip(slots)
            .zip(mime_types)
            .map(|((file, slot), mime_type)| AcceptedFile {
                file,
                slot,
                mime_type,
            })
            .collect();

        self.screen(&accepted).await?;
        self.store(contact_id, &accepted).await?;

        tracing::info!(
            contact_id = %contact_id,
            file_count = accepted.len(),
            duration_ms = start.elapsed().as_millis(),
            "Registration documents uploaded"
        );

        Ok(UploadAck::now())
    }

    async fn hash_files(&self, files: &mut [UploadedFile]) -> Result<(), AppError> {
        for file in files.iter_mut() {
            let hash = sha256_file(file.path()).await.map_err(|e| {
                AppError::Internal(format!(
                    "Failed to hash file for field '{}': {}",
                    file.field_name, e
                ))
            })?;
            tracing::debug!(field = %file.field_name, sha256 = %hash, "File hashed");
            file.content_hash = Some(hash);
        }
        Ok(())
    }

    /// Look up every hash concurrently and decide once all lookups have finished.
    async fn screen(&self, files: &[AcceptedFile<'_>]) -> Result<(), AppError> {
        let lookups = files.iter().map(|accepted| {
            let hash = accepted.file.content_hash.as_deref().unwrap_or_default();
            self.reputation.lookup(hash)
        });
        let verdicts = join_all(lookups).await;

        let mut flagged = Vec::new();
        let mut first_fault = None;

        for (accepted, verdict) in files.iter().zip(verdicts) {
            match verdict {
                Ok(verdict) if verdict.is_malicious(self.malicious_threshold) => {
                    let malicious = match &verdict {
                        Verdict::Analyzed(stats) => stats.malicious,
                        Verdict::Unknown => 0,
                    };
                    tracing::warn!(
                        field = %accepted.file.field_name,
                        sha256 = accepted.file.content_hash.as_deref().unwrap_or_default(),
                        malicious,
                        "Rejected upload: file flagged as malicious"
                    );
                    flagged.push(accepted.file.field_name.clone());
                }
                Ok(_) => {}
                Err(e) => {
                    if first_fault.is_none() {
                        first_fault = Some(e);
                    }
                }
            }
        }

        if let Some(fault) = first_fault {
            return Err(reputation_error_to_app(fault));
        }

        if !flagged.is_empty() {
            return Err(AppError::VirusDetected { fields: flagged });
        }

        Ok(())
    }

    /// Upload files one at a time, in received order.
    async fn store(&self, contact_id: &str, files: &[AcceptedFile<'_>]) -> Result<(), AppError> {
        for (index, accepted) in files.iter().enumerate() {
            let key = destination_key(
                contact_id,
                index + 1,
                accepted.slot,
                &accepted.file.original_file_name,
            );

            let reader = tokio::fs::File::open(accepted.file.path()).await?;

            self.storage
                .upload_stream(
                    &key,
                    accepted.mime_type.as_str(),
                    Some(accepted.file.size),
                    Box::pin(reader),
                )
                .await
                .map_err(storage_error_to_app)?;
        }
        Ok(())
    }
}

/// Every field name must map to a document slot.
fn validate_fields(files: &[UploadedFile]) -> Result<Vec<DocumentSlot>, AppError> {
    files
        .iter()
        .map(|file| {
            DocumentSlot::from_field_name(&file.field_name).ok_or_else(|| {
                tracing::debug!(field = %file.field_name, "Rejected upload: unknown field");
                AppError::UnknownField(file.field_name.clone())
            })
        })
        .collect()
}

/// Every declared content type must be accepted.
fn validate_types(files: &[UploadedFile]) -> Result<Vec<AcceptedMimeType>, AppError> {
    files
        .iter()
        .map(|file| {
            AcceptedMimeType::parse(&file.mime_type).ok_or_else(|| {
                tracing::debug!(
                    field = %file.field_name,
                    content_type = %file.mime_type,
                    "Rejected upload: unknown file type"
                );
                AppError::UnknownFileType(file.mime_type.clone())
            })
        })
        .collect()
}
