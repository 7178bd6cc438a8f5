//! Dossier Core Library
//!
//! This crate provides the document slot table, accepted content types, error types and
//! configuration shared across all Dossier components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, GcpServiceAccount};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AcceptedMimeType, DocumentSlot};
pub use storage_types::StorageBackend;
