/// Default per-part size limit in megabytes.
pub const MAX_FILE_SIZE_MB: usize = 10;

/// Default maximum number of file parts in one upload request.
pub const MAX_FILES: usize = 20;

/// A reputation report with strictly more malicious detections than this is rejected.
pub const MALICIOUS_DETECTION_THRESHOLD: u64 = 1;

/// Default timeout for reputation lookups.
pub const REPUTATION_TIMEOUT_SECS: u64 = 30;

pub const VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com";

/// Content type assumed for parts that do not declare one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
