//! Dossier Services Layer
//!
//! Content hashing and file reputation lookups used by the upload pipeline. The api crate
//! depends on the `ReputationService` trait only, so the VirusTotal client can be swapped
//! for a recording double in tests.

pub mod hashing;
pub mod reputation;

pub use hashing::{sha256_file, sha256_hex};
pub use reputation::{
    AnalysisStats, ReputationError, ReputationService, Verdict, VirusTotalService,
};
