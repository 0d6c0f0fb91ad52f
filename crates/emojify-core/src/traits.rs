use crate::{completion::Completion, error::EmojifyError, outcome::LogEvent};
use async_trait::async_trait;

/// Remote language model backend.
///
/// Both interchangeable backends (OpenAI, Gemini) implement this trait so the
/// pipeline can route between them without knowing their wire formats.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name as it appears in responses and logs.
    fn name(&self) -> &str;

    /// Whether a credential is configured.
    fn has_api_key(&self) -> bool;

    /// Run a single-shot completion and return the raw reply text.
    ///
    /// An empty string means the backend answered without content.
    async fn complete(&self, completion: &Completion) -> Result<String, EmojifyError>;

    /// Check if the provider is reachable with the configured credential.
    async fn is_available(&self) -> bool;
}

/// Classifies the dominant language of a text.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Two-letter lowercase language code, or `None` when detection is
    /// unavailable. Never fails.
    async fn detect(&self, text: &str) -> Option<String>;
}

/// Admission gate keyed by client identifier.
pub trait RateLimiter: Send + Sync {
    /// Record a request for `key` and report whether it must be rejected.
    ///
    /// `true` means the limit is exceeded and the request was not counted.
    fn is_limited(&self, key: &str) -> bool;
}

/// Sink for the single per-request outcome record.
pub trait OutcomeLogger: Send + Sync {
    /// Emit one event. Must not block and must not fail.
    fn record(&self, event: &LogEvent);
}
