//! File reputation lookups by content hash.
//!
//! `VirusTotalService` queries the VirusTotal v3 file report endpoint. A report that was
//! never produced for a hash is a normal outcome (`Verdict::Unknown`), not an error.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Engine counters from the last analysis of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisStats {
    #[serde(default)]
    pub malicious: u64,
    #[serde(default)]
    pub suspicious: u64,
    #[serde(default)]
    pub undetected: u64,
    #[serde(default)]
    pub harmless: u64,
}

/// Outcome of a reputation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The service has no report for this hash.
    Unknown,
    /// The service has analyzed this content before.
    Analyzed(AnalysisStats),
}

impl Verdict {
    /// A file is malicious when strictly more than `threshold` engines flagged it.
    pub fn is_malicious(&self, threshold: u64) -> bool {
        match self {
            Verdict::Unknown => false,
            Verdict::Analyzed(stats) => stats.malicious > threshold,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("Reputation request failed: {0}")]
    Request(String),

    #[error("Unexpected reputation service status: {0}")]
    UnexpectedStatus(u16),

    #[error("Invalid reputation response: {0}")]
    InvalidResponse(String),
}

/// Looks up a content hash against a file reputation service.
#[async_trait]
pub trait ReputationService: Send + Sync {
    /// `sha256` is the lowercase hex digest of the file content.
    async fn lookup(&self, sha256: &str) -> Result<Verdict, ReputationError>;
}

#[derive(Debug, Deserialize)]
struct FileReport {
    data: FileReportData,
}

#[derive(Debug, Deserialize)]
struct FileReportData {
    attributes: FileReportAttributes,
}

#[derive(Debug, Deserialize)]
struct FileReportAttributes {
    #[serde(default)]
    last_analysis_stats: AnalysisStats,
}

/// VirusTotal v3 client
pub struct VirusTotalService {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    fail_closed: bool,
}

impl Debug for VirusTotalService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VirusTotalService")
            .field("base_url", &self.base_url)
            .field("fail_closed", &self.fail_closed)
            .finish()
    }
}

impl VirusTotalService {
    /// Create a new VirusTotalService.
    ///
    /// # Arguments
    /// * `base_url` - Service root, e.g. `https://www.virustotal.com`
    /// * `api_key` - Value sent in the `x-apikey` header
    /// * `timeout_secs` - Per-request timeout
    /// * `fail_closed` - If true, unexpected HTTP statuses are errors; if false they are
    ///   treated like an unknown hash (fail-open)
    pub fn new(
        base_url: String,
        api_key: String,
        timeout_secs: u64,
        fail_closed: bool,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client for VirusTotal")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            fail_closed,
        })
    }

    fn report_url(&self, sha256: &str) -> String {
        format!("{}/api/v3/files/{}", self.base_url, sha256)
    }
}

#[async_trait]
impl ReputationService for VirusTotalService {
    async fn lookup(&self, sha256: &str) -> Result<Verdict, ReputationError> {
        let start = Instant::now();

        let response = self
            .http_client
            .get(self.report_url(sha256))
            .header("x-apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, sha256 = %sha256, "VirusTotal request failed");
                ReputationError::Request(e.to_string())
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(
                sha256 = %sha256,
                duration_ms = start.elapsed().as_millis(),
                "Hash unknown to VirusTotal"
            );
            return Ok(Verdict::Unknown);
        }

        if status != reqwest::StatusCode::OK {
            if self.fail_closed {
                tracing::error!(
                    status = status.as_u16(),
                    sha256 = %sha256,
                    "Unexpected VirusTotal status"
                );
                return Err(ReputationError::UnexpectedStatus(status.as_u16()));
            }
            tracing::warn!(
                status = status.as_u16(),
                sha256 = %sha256,
                "Unexpected VirusTotal status, continuing (fail-open)"
            );
            return Ok(Verdict::Unknown);
        }

        let report: FileReport = response
            .json()
            .await
            .map_err(|e| ReputationError::InvalidResponse(e.to_string()))?;

        let stats = report.data.attributes.last_analysis_stats;
        tracing::debug!(
            sha256 = %sha256,
            malicious = stats.malicious,
            suspicious = stats.suspicious,
            duration_ms = start.elapsed().as_millis(),
            "VirusTotal report retrieved"
        );

        Ok(Verdict::Analyzed(stats))
    }
}
