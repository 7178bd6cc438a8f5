//! Dossier Storage Library
//!
//! This crate provides the storage abstraction for registration documents and its
//! implementations: Google Cloud Storage and S3 (through `object_store`) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! Keys are scoped by registration contact:
//!
//! - `{contact_id}/{NN}-{canonical slot name}{original extension}`
//!
//! `NN` is the file's 1-based position in the upload request, zero-padded to two digits.
//! Key generation is centralized in the `keys` module so all backends stay consistent.

#[cfg(feature = "storage-cloud")]
pub mod cloud;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-cloud")]
pub use cloud::CloudStorage;
pub use dossier_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{destination_key, file_extension};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
