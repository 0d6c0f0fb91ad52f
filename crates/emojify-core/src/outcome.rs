//! Translation results and the per-request log record.

use crate::routing::ProviderKind;
use serde::{Deserialize, Serialize};

/// Marker sent in degraded responses.
pub const AI_FAILED: &str = "ai_failed";

/// Placeholder for fields that do not apply to a request.
pub const NOT_APPLICABLE: &str = "n/a";

/// Placeholder for a missing language detection.
pub const UNKNOWN_LANG: &str = "unknown";

/// Where a translation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// A remote model produced the text.
    Ai,
    /// The local dictionary produced the text.
    Local,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Local => "local",
        }
    }
}

/// Body of a successful translation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub output: String,
    pub source: Source,
    /// Provider that was attempted. Absent when no provider was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationOutcome {
    /// Remote result accepted as-is.
    pub fn ai(output: String, provider: ProviderKind) -> Self {
        Self {
            output,
            source: Source::Ai,
            provider: Some(provider),
            error: None,
        }
    }

    /// Local dictionary result standing in for a failed remote call.
    pub fn degraded(output: String, provider: Option<ProviderKind>) -> Self {
        Self {
            output,
            source: Source::Local,
            provider,
            error: Some(AI_FAILED.to_string()),
        }
    }
}

/// One structured record per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    /// Hashed client identifier.
    pub ip: String,
    pub duration_ms: u64,
    pub provider: String,
    pub source: String,
    pub lang: String,
    pub rate_limited: bool,
}

impl LogEvent {
    /// Event with every optional field marked not-applicable.
    pub fn new(ip_hash: &str) -> Self {
        Self {
            event: "translate".to_string(),
            ip: ip_hash.to_string(),
            duration_ms: 0,
            provider: NOT_APPLICABLE.to_string(),
            source: NOT_APPLICABLE.to_string(),
            lang: UNKNOWN_LANG.to_string(),
            rate_limited: false,
        }
    }
}
