use std::fmt::{Display, Formatter, Result as FmtResult};

/// Content types accepted for registration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcceptedMimeType {
    Jpeg,
    Png,
    Pdf,
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

impl AcceptedMimeType {
    /// Match a declared content type against the accepted set.
    ///
    /// Parameters are ignored and the comparison is case-insensitive, so
    /// `Application/PDF; name=x` is accepted but `image/jpg` is not.
    pub fn parse(content_type: &str) -> Option<Self> {
        let normalized = normalize_mime_type(content_type).to_ascii_lowercase();
        match normalized.as_str() {
            "image/jpeg" => Some(AcceptedMimeType::Jpeg),
            "image/png" => Some(AcceptedMimeType::Png),
            "application/pdf" => Some(AcceptedMimeType::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptedMimeType::Jpeg => "image/jpeg",
            AcceptedMimeType::Png => "image/png",
            AcceptedMimeType::Pdf => "application/pdf",
        }
    }
}

impl Display for AcceptedMimeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
