//! OpenAI-compatible API provider.
//!
//! Calls the chat completions endpoint with the prompt as a single user
//! message. Works with any endpoint speaking the same format.

use async_trait::async_trait;
use emojify_core::{completion::Completion, error::EmojifyError, traits::Provider};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
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

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: Option<u64>,
}

fn build_request(model: &str, completion: &Completion) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: completion.prompt.clone(),
        }],
        temperature: completion.temperature,
        max_tokens: completion.max_output_tokens,
    }
}

fn reply_text(parsed: &ChatCompletionResponse) -> String {
    parsed
        .choices
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.clone())
        .unwrap_or_default()
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(&self, completion: &Completion) -> Result<String, EmojifyError> {
        if !self.has_api_key() {
            return Err(EmojifyError::Provider(
                "openai: no API key configured".to_string(),
            ));
        }

        let start = Instant::now();
        let body = build_request(&self.model, completion);

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("openai: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| EmojifyError::Provider(format!("openai request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmojifyError::Provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| EmojifyError::Provider(format!("openai: failed to parse response: {e}")))?;

        let tokens = parsed.usage.as_ref().and_then(|u| u.total_tokens);
        debug!(
            "openai: completed in {}ms, tokens={tokens:?}",
            start.elapsed().as_millis()
        );

        Ok(reply_text(&parsed))
    }

    async fn is_available(&self) -> bool {
        if !self.has_api_key() {
            warn!("openai: no API key configured");
            return false;
        }
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("openai not available: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_name() {
        let p = OpenAiProvider::from_config(
            "https://api.openai.com/v1".into(),
            "sk-test".into(),
            "gpt-4.1-nano".into(),
        );
        assert_eq!(p.name(), "openai");
        assert!(p.has_api_key());
    }

    #[test]
    fn test_openai_request_serialization() {
        let completion = Completion::translation("I love pizza", 0.9, 75);
        let body = build_request("gpt-4.1-nano", &completion);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4.1-nano");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .ends_with("Text: I love pizza"));
        assert_eq!(json["max_tokens"], 75);
        assert!((json["temperature"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_openai_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"❤️🍕"},"finish_reason":"stop"}],"model":"gpt-4.1-nano","usage":{"total_tokens":42,"prompt_tokens":10,"completion_tokens":32}}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(&resp), "❤️🍕");
        assert_eq!(resp.usage.as_ref().and_then(|u| u.total_tokens), Some(42));
    }

    #[test]
    fn test_openai_response_without_content_is_empty() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply_text(&resp), "");

        let resp: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(reply_text(&resp), "");
    }

    #[tokio::test]
    async fn test_openai_missing_key_fails_without_request() {
        let p = OpenAiProvider::from_config(
            "http://127.0.0.1:9".into(),
            String::new(),
            "gpt-4.1-nano".into(),
        );
        assert!(!p.has_api_key());
        let err = p
            .complete(&Completion::translation("hi", 0.9, 75))
            .await
            .unwrap_err();
        assert!(matches!(err, EmojifyError::Provider(_)));
        assert!(!p.is_available().await);
    }
}
