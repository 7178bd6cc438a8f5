//! Registration upload pipeline: multipart spooling, validation, screening and storage.

mod multipart;
mod service;
mod types;

pub use multipart::spool_multipart;
pub use service::RegistrationUploadService;
pub use types::{UploadAck, UploadLimits, UploadedFile};
