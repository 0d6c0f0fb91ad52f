//! Model-backed language detection.
//!
//! Asks a provider for an ISO 639-1 code and extracts the first two-letter
//! run from the reply. Every failure degrades to `None`.

use async_trait::async_trait;
use emojify_core::{
    completion::Completion,
    traits::{LanguageDetector, Provider},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Language detector that classifies text with a remote model.
pub struct ModelLanguageDetector {
    provider: Arc<dyn Provider>,
}

impl ModelLanguageDetector {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

/// Lower-case the reply and take the first run of two ASCII letters.
pub fn extract_language_code(reply: &str) -> Option<String> {
    let lowered = reply.trim().to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    chars
        .windows(2)
        .find(|pair| pair.iter().all(|c| c.is_ascii_lowercase()))
        .map(|pair| pair.iter().collect())
}

#[async_trait]
impl LanguageDetector for ModelLanguageDetector {
    async fn detect(&self, text: &str) -> Option<String> {
        if !self.provider.has_api_key() {
            debug!("language detection skipped: {} has no API key", self.provider.name());
            return None;
        }

        match self.provider.complete(&Completion::language_detection(text)).await {
            Ok(reply) => {
                let code = extract_language_code(&reply);
                debug!("language detection reply {reply:?} -> {code:?}");
                code
            }
            Err(e) => {
                warn!("language detection failed, routing to default provider: {e}");
                None
            }
        }
    }
}
