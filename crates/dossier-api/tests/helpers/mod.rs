//! Test helpers: build AppState and router for integration tests.
//!
//! Collaborators are in-process doubles: an `InMemory` object store wrapped to record
//! writes, and a reputation stub with canned verdicts (or a real VirusTotal client pointed
//! at a mockito server).
//!
//! Run from workspace root: `cargo test -p dossier-api --test upload_test`.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use dossier_api::setup::routes;
use dossier_api::state::AppState;
use dossier_core::constants::VIRUSTOTAL_BASE_URL;
use dossier_core::{Config, StorageBackend};
use dossier_services::{AnalysisStats, ReputationError, ReputationService, Verdict};
use dossier_storage::{CloudStorage, Storage, StorageResult};
use object_store::memory::InMemory;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncRead;

/// Object storage double that records every key written, in write order.
pub struct RecordingStorage {
    inner: CloudStorage,
    keys: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self {
            inner: CloudStorage::from_store(
                Arc::new(InMemory::new()),
                "register-files".to_string(),
                StorageBackend::Gcs,
            ),
            keys: Mutex::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }

    pub async fn read(&self, key: &str) -> Vec<u8> {
        self.inner.download(key).await.expect("object should exist")
    }
}

impl Default for RecordingStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let written = self
            .inner
            .upload_stream(storage_key, content_type, content_length, reader)
            .await?;
        self.keys.lock().unwrap().push(storage_key.to_string());
        Ok(written)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Reputation double: hashes listed in `detections` are reported with that many malicious
/// engines, hashes in `failing` return a transport error, everything else is unknown.
#[derive(Default)]
pub struct StubReputation {
    pub detections: HashMap<String, u64>,
    pub failing: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubReputation {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ReputationService for StubReputation {
    async fn lookup(&self, sha256: &str) -> Result<Verdict, ReputationError> {
        self.calls.lock().unwrap().push(sha256.to_string());
        if self.failing.iter().any(|h| h == sha256) {
            return Err(ReputationError::Request("connection refused".to_string()));
        }
        Ok(match self.detections.get(sha256) {
            Some(malicious) => Verdict::Analyzed(AnalysisStats {
                malicious: *malicious,
                ..AnalysisStats::default()
            }),
            None => Verdict::Unknown,
        })
    }
}

/// Configuration matching the production defaults, without touching the environment.
pub fn create_test_config() -> Config {
    Config {
        server_port: 3000,
        log_format: "text".to_string(),
        storage_backend: StorageBackend::Gcs,
        gcs_bucket: Some("register-files".to_string()),
        gcp_service_account: None,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: None,
        virustotal_api_key: "test-key".to_string(),
        virustotal_base_url: VIRUSTOTAL_BASE_URL.to_string(),
        reputation_timeout_secs: 5,
        reputation_fail_closed: false,
        malicious_detection_threshold: 1,
        max_file_size_bytes: 10 * 1024 * 1024,
        max_files: 20,
    }
}

/// Test application: server plus handles on its collaborators.
pub struct TestApp<R> {
    pub server: TestServer,
    pub storage: Arc<RecordingStorage>,
    pub reputation: Arc<R>,
}

impl<R> TestApp<R> {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Build a test server around the given config and reputation service.
pub fn setup_test_app_with<R>(config: Config, reputation: R) -> TestApp<R>
where
    R: ReputationService + 'static,
{
    let storage = Arc::new(RecordingStorage::new());
    let reputation = Arc::new(reputation);

    let state = Arc::new(AppState::new(
        config,
        storage.clone(),
        reputation.clone(),
    ));
    let app = routes::setup_routes(state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        reputation,
    }
}

/// Default config, every hash unknown to the reputation service.
pub fn setup_test_app() -> TestApp<StubReputation> {
    setup_test_app_with(create_test_config(), StubReputation::default())
}
