//! Dossier API Library
//!
//! This crate provides the HTTP handler for registration document uploads and the
//! application setup around it.

mod handlers;
mod telemetry;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
