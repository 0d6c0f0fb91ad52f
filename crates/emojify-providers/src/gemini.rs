//! Google Gemini API provider.
//!
//! Calls the Gemini `generateContent` endpoint. Auth via the `x-goog-api-key`
//! header so the credential never appears in a URL.

use async_trait::async_trait;
use emojify_core::{completion::Completion, error::EmojifyError, traits::Provider};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    /// Create from config values.
    pub fn from_config(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    total_token_count: u64,
}

fn build_request(completion: &Completion) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: completion.prompt.clone(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: completion.temperature,
            max_output_tokens: completion.max_output_tokens,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(parsed: &GeminiResponse) -> String {
    parsed
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default()
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(&self, completion: &Completion) -> Result<String, EmojifyError> {
        if !self.has_api_key() {
            return Err(EmojifyError::Provider(
                "gemini: no API key configured".to_string(),
            ));
        }

        let start = Instant::now();
        let body = build_request(completion);

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        debug!("gemini: POST {url}");

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                EmojifyError::Provider(format!("gemini request failed: {}", e.without_url()))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmojifyError::Provider(format!(
                "gemini returned {status}: {text}"
            )));
        }

        let parsed: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| {
                EmojifyError::Provider(format!(
                    "gemini: failed to parse response: {}",
                    e.without_url()
                ))
            })?;

        let tokens = parsed.usage_metadata.as_ref().map(|u| u.total_token_count);
        debug!(
            "gemini: completed in {}ms, tokens={tokens:?}",
            start.elapsed().as_millis()
        );

        Ok(reply_text(&parsed))
    }

    async fn is_available(&self) -> bool {
        if !self.has_api_key() {
            warn!("gemini: no API key configured");
            return false;
        }
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("gemini not available: {}", e.without_url());
                false
            }
        }
    }
}
