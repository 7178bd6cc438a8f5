//! Configuration module
//!
//! Process-wide configuration is read from the environment (and an optional `.env` file)
//! once at startup. Nothing here is reloaded afterwards.

use std::env;

use serde::Serialize;

use crate::constants::{
    MALICIOUS_DETECTION_THRESHOLD, MAX_FILES, MAX_FILE_SIZE_MB, REPUTATION_TIMEOUT_SECS,
    VIRUSTOTAL_BASE_URL,
};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;

/// Google service account credential, assembled from the `GCP_*` variables.
///
/// Serializes to the JSON key file layout expected by Google client libraries.
#[derive(Clone, Debug, Serialize)]
pub struct GcpServiceAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
}

impl GcpServiceAccount {
    /// Read the service account from the environment.
    ///
    /// Returns `None` when neither `GCP_PRIVATE_KEY` nor `GCP_CLIENT_EMAIL` is set, in which case
    /// the storage client falls back to its own credential discovery.
    pub fn from_env() -> Option<Self> {
        let private_key = env::var("GCP_PRIVATE_KEY").ok().filter(|s| !s.is_empty())?;
        let client_email = env::var("GCP_CLIENT_EMAIL").ok().filter(|s| !s.is_empty())?;

        let var = |name: &str| env::var(name).unwrap_or_default();

        Some(Self {
            account_type: "service_account".to_string(),
            project_id: var("GCP_PROJECT_ID"),
            private_key_id: var("GCP_PRIVATE_KEY_ID"),
            // Keys pasted into env files usually carry escaped newlines
            private_key: private_key.replace("\\n", "\n"),
            client_email,
            client_id: var("GCP_CLIENT_ID"),
            auth_uri: env::var("GCP_AUTH_URI")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string()),
            token_uri: env::var("GCP_TOKEN_URI")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            auth_provider_x509_cert_url: env::var("GCP_AUTH_PROVIDER_X509_CERT_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v1/certs".to_string()),
            client_x509_cert_url: var("GCP_CLIENT_X509_CERT_URL"),
        })
    }

    /// Service account key JSON.
    pub fn to_json(&self) -> Result<String, anyhow::Error> {
        serde_json::to_string(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize GCP service account: {}", e))
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub log_format: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub gcs_bucket: Option<String>,
    pub gcp_service_account: Option<GcpServiceAccount>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub local_storage_path: Option<String>,
    // Reputation service configuration
    pub virustotal_api_key: String,
    pub virustotal_base_url: String,
    pub reputation_timeout_secs: u64,
    pub reputation_fail_closed: bool,
    pub malicious_detection_threshold: u64,
    // Upload limits
    pub max_file_size_bytes: usize,
    pub max_files: usize,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => s.parse()?,
            Err(_) => StorageBackend::Gcs,
        };

        let server_port = match env::var("PORT") {
            Ok(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            Err(_) => SERVER_PORT,
        };

        let config = Config {
            server_port,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .to_lowercase(),
            storage_backend,
            gcs_bucket: non_empty("GCS_BUCKET"),
            gcp_service_account: GcpServiceAccount::from_env(),
            s3_bucket: non_empty("S3_BUCKET"),
            s3_region: non_empty("S3_REGION").or_else(|| non_empty("AWS_REGION")),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            virustotal_api_key: non_empty("VIRUSTOTAL_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("VIRUSTOTAL_API_KEY must be set"))?,
            virustotal_base_url: non_empty("VIRUSTOTAL_BASE_URL")
                .unwrap_or_else(|| VIRUSTOTAL_BASE_URL.to_string()),
            reputation_timeout_secs: parse_or("REPUTATION_TIMEOUT_SECS", REPUTATION_TIMEOUT_SECS),
            reputation_fail_closed: parse_flag("REPUTATION_FAIL_CLOSED", false),
            malicious_detection_threshold: parse_or(
                "MALICIOUS_DETECTION_THRESHOLD",
                MALICIOUS_DETECTION_THRESHOLD,
            ),
            max_file_size_bytes: parse_or("MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB) * 1024 * 1024,
            max_files: parse_or("MAX_FILES", MAX_FILES),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_files == 0 {
            return Err(anyhow::anyhow!("MAX_FILES must be at least 1"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be at least 1"));
        }

        if !self.virustotal_base_url.starts_with("http://")
            && !self.virustotal_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "VIRUSTOTAL_BASE_URL must be an http(s) URL"
            ));
        }

        match self.storage_backend {
            StorageBackend::Gcs => {
                if self.gcs_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "GCS_BUCKET must be set when using GCS storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Upper bound for a whole request body: every part at its maximum plus framing headroom.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_files
            .saturating_mul(self.max_file_size_bytes)
            .saturating_add(1024 * 1024)
    }
}
